use crate::core::language::Language;
use crate::core::video::VideoId;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

/// A timed text fragment of a transcript.
///
/// Key-value records deserialize directly; `start` and `duration` are optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranscriptEntry {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl TranscriptEntry {
    #[cfg(test)]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: None,
            duration: None,
        }
    }
}

/// One caption track offered by the transcript service.
#[async_trait]
pub trait CaptionTrack: Send + Sync + Sized {
    fn language_code(&self) -> &str;

    /// Whether the track was produced by speech recognition.
    fn is_generated(&self) -> bool;

    async fn fetch(&self) -> Result<Vec<TranscriptEntry>>;

    fn translate(&self, language_code: &str) -> Result<Self>;
}

/// Tracks available for a video, grouped the way the service reports them.
#[derive(Debug, Clone)]
pub struct TrackList<T> {
    pub manual: Vec<T>,
    pub generated: Vec<T>,
}

impl<T: CaptionTrack> TrackList<T> {
    /// Orders each group by language code so the first candidate is stable.
    pub fn new(mut manual: Vec<T>, mut generated: Vec<T>) -> Self {
        manual.sort_by(|a, b| a.language_code().cmp(b.language_code()));
        generated.sort_by(|a, b| a.language_code().cmp(b.language_code()));
        Self { manual, generated }
    }
}

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    type Track: CaptionTrack;

    async fn list_tracks(&self, video_id: &VideoId) -> Result<TrackList<Self::Track>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptOrigin {
    Manual,
    Generated,
    Translated { from: String },
}

impl std::fmt::Display for TranscriptOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual => f.write_str("manual"),
            Self::Generated => f.write_str("auto-generated"),
            Self::Translated { from } => write!(f, "translated from {from}"),
        }
    }
}

/// Normalized transcript text of one video.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub entries: Vec<TranscriptEntry>,
    pub origin: TranscriptOrigin,
}

impl Transcript {
    /// Joins the entry texts with single spaces. Fails when nothing is left.
    pub fn from_entries(
        video_id: &VideoId,
        entries: Vec<TranscriptEntry>,
        origin: TranscriptOrigin,
    ) -> Result<Self> {
        let text = normalize(&entries);
        if text.is_empty() {
            return Err(Error::EmptyTranscript {
                video_id: video_id.to_string(),
            });
        }
        Ok(Self {
            text,
            entries,
            origin,
        })
    }

    /// One line per entry, prefixed with its time range when the service provided one.
    pub fn timed_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| !entry.text.trim().is_empty())
            .map(|entry| match (entry.start, entry.duration) {
                (Some(start), Some(duration)) => format!(
                    "[{} - {}] {}",
                    format_timestamp(start),
                    format_timestamp(start + duration),
                    entry.text.trim()
                ),
                (Some(start), None) => {
                    format!("[{}] {}", format_timestamp(start), entry.text.trim())
                }
                _ => entry.text.trim().to_string(),
            })
            .collect()
    }
}

fn format_timestamp(seconds: f64) -> String {
    let total_millis = (seconds * 1000.0).round() as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1_000;
    let millis = total_millis % 1_000;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}.{millis:03}")
    } else {
        format!("{minutes:02}:{secs:02}.{millis:03}")
    }
}

fn normalize(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.text.as_str())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Finds the best available transcript for a video in the requested language.
///
/// Stages run in order and each one only after the previous one failed:
/// manual track in the language, generated track in the language, then any
/// track translated (or fetched as-is) into the language.
pub struct TranscriptResolver<S> {
    source: S,
}

impl<S: TranscriptSource> TranscriptResolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn resolve(&self, video_id: &VideoId, language: Language) -> Result<Transcript> {
        let tracks = self.source.list_tracks(video_id).await.map_err(|e| {
            Error::TranscriptListUnavailable {
                video_id: video_id.to_string(),
                reason: e.to_string(),
            }
        })?;
        debug!(
            manual = tracks.manual.len(),
            generated = tracks.generated.len(),
            "listed transcript tracks for {video_id}"
        );

        let target = language.service_code();
        let mut failures = Vec::with_capacity(3);

        match fetch_exact(&tracks.manual, target).await {
            Ok(entries) => {
                info!("Using manual transcript ({target})");
                return Transcript::from_entries(video_id, entries, TranscriptOrigin::Manual);
            }
            Err(e) => {
                debug!("manual stage failed: {e}");
                failures.push(format!(
                    "Manual transcript not available in {language}: {e}"
                ));
            }
        }

        match fetch_exact(&tracks.generated, target).await {
            Ok(entries) => {
                info!("Using auto-generated transcript ({target})");
                return Transcript::from_entries(video_id, entries, TranscriptOrigin::Generated);
            }
            Err(e) => {
                debug!("auto-generated stage failed: {e}");
                failures.push(format!(
                    "Auto-generated transcript not available in {language}: {e}"
                ));
            }
        }

        match translate_fallback(&tracks, target).await {
            Ok((entries, from)) => {
                info!("Using transcript from {from} track for {target}");
                Transcript::from_entries(
                    video_id,
                    entries,
                    TranscriptOrigin::Translated { from },
                )
            }
            Err(e) => {
                debug!("translate stage failed: {e}");
                failures.push(format!(
                    "Could not get or translate available transcript: {e}"
                ));
                Err(Error::NoTranscriptAvailable { failures })
            }
        }
    }
}

async fn fetch_exact<T: CaptionTrack>(tracks: &[T], code: &str) -> Result<Vec<TranscriptEntry>> {
    let track = tracks
        .iter()
        .find(|track| track.language_code() == code)
        .ok_or_else(|| Error::custom(format!("no track for language code '{code}'")))?;
    track.fetch().await
}

/// Tries the first machine-generated track of the manual group, then the first
/// track of the generated group. Returns the entries and the source track's
/// language code.
async fn translate_fallback<T: CaptionTrack>(
    tracks: &TrackList<T>,
    target: &str,
) -> Result<(Vec<TranscriptEntry>, String)> {
    let candidates = [
        tracks.manual.iter().find(|track| track.is_generated()),
        tracks.generated.first(),
    ];

    let mut reasons = Vec::new();
    for track in candidates.into_iter().flatten() {
        match fetch_in_language(track, target).await {
            Ok(entries) => return Ok((entries, track.language_code().to_string())),
            Err(e) => reasons.push(format!("{} track: {e}", track.language_code())),
        }
    }

    if reasons.is_empty() {
        Err(Error::custom("No transcripts available for this video"))
    } else {
        Err(Error::custom(reasons.join("; ")))
    }
}

async fn fetch_in_language<T: CaptionTrack>(track: &T, target: &str) -> Result<Vec<TranscriptEntry>> {
    if track.language_code() == target {
        track.fetch().await
    } else {
        track.translate(target)?.fetch().await
    }
}
