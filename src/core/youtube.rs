use crate::core::transcript::{CaptionTrack, TrackList, TranscriptEntry, TranscriptSource};
use crate::core::video::VideoId;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use yt_transcript_rs::{FetchedTranscriptSnippet, Transcript, api::YouTubeTranscriptApi};

/// Transcript source backed by YouTube's caption tracks.
#[derive(Clone)]
pub struct YoutubeTranscripts {
    api: YouTubeTranscriptApi,
    http: Client,
}

impl YoutubeTranscripts {
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| Error::custom(format!("Failed to initialize transcript client: {e}")))?;
        Ok(Self {
            api,
            http: Client::new(),
        })
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscripts {
    type Track = YoutubeTrack;

    async fn list_tracks(&self, video_id: &VideoId) -> Result<TrackList<YoutubeTrack>> {
        let list = self
            .api
            .list_transcripts(video_id.as_str())
            .await
            .map_err(Error::custom)?;

        let wrap = |track: &Transcript| YoutubeTrack {
            inner: track.clone(),
            http: self.http.clone(),
        };

        Ok(TrackList::new(
            list.manually_created_transcripts.values().map(wrap).collect(),
            list.generated_transcripts.values().map(wrap).collect(),
        ))
    }
}

pub struct YoutubeTrack {
    inner: Transcript,
    http: Client,
}

#[async_trait]
impl CaptionTrack for YoutubeTrack {
    fn language_code(&self) -> &str {
        self.inner.language_code()
    }

    fn is_generated(&self) -> bool {
        self.inner.is_generated()
    }

    async fn fetch(&self) -> Result<Vec<TranscriptEntry>> {
        let fetched = self
            .inner
            .fetch(&self.http, false)
            .await
            .map_err(Error::custom)?;
        Ok(fetched.snippets.iter().map(TranscriptEntry::from).collect())
    }

    fn translate(&self, language_code: &str) -> Result<Self> {
        let inner = self.inner.translate(language_code).map_err(Error::custom)?;
        Ok(Self {
            inner,
            http: self.http.clone(),
        })
    }
}

impl From<&FetchedTranscriptSnippet> for TranscriptEntry {
    fn from(snippet: &FetchedTranscriptSnippet) -> Self {
        Self {
            text: snippet.text.clone(),
            start: Some(snippet.start),
            duration: Some(snippet.duration),
        }
    }
}
