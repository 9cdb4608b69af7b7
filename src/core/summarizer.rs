use crate::core::language::Language;
use crate::core::summary::{CompletionClient, SummaryGenerator, Tier};
use crate::core::transcript::{TranscriptResolver, TranscriptSource};
use crate::core::video::extract_video_id;
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Summary,
    Translation,
}

/// Progress reported while a video is summarized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SummaryEvent<'a> {
    SectionStarted {
        tier: Tier,
        language: Language,
        kind: SectionKind,
    },
    /// Incremental text of the current section (streaming mode only).
    Fragment(&'a str),
    SectionFinished { text: &'a str },
}

/// Summaries of one video keyed by language and tier.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub video_id: String,
    pub summaries: BTreeMap<Language, BTreeMap<Tier, String>>,
}

impl SummaryReport {
    fn new(video_id: String) -> Self {
        Self {
            video_id,
            summaries: Language::ALL
                .into_iter()
                .map(|language| (language, BTreeMap::new()))
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn get(&self, language: Language, tier: Tier) -> Option<&str> {
        self.summaries
            .get(&language)
            .and_then(|tiers| tiers.get(&tier))
            .map(String::as_str)
    }

    fn insert(&mut self, language: Language, tier: Tier, text: String) {
        self.summaries.entry(language).or_default().insert(tier, text);
    }
}

pub struct Summarizer<S, C> {
    resolver: TranscriptResolver<S>,
    generator: SummaryGenerator<C>,
    language: Language,
    dual_language: bool,
}

impl<S: TranscriptSource, C: CompletionClient> Summarizer<S, C> {
    pub fn new(
        source: S,
        generator: SummaryGenerator<C>,
        language: Language,
        dual_language: bool,
    ) -> Self {
        Self {
            resolver: TranscriptResolver::new(source),
            generator,
            language,
            dual_language,
        }
    }

    /// Fetches the transcript behind `url` and summarizes it at every tier.
    /// The first failure aborts the run.
    pub async fn summarize_video(
        &self,
        url: &str,
        on_event: &mut dyn FnMut(SummaryEvent<'_>),
    ) -> Result<SummaryReport> {
        let video_id = extract_video_id(url)?;
        info!("Fetching transcript for video {video_id}");
        let transcript = self.resolver.resolve(&video_id, self.language).await?;
        info!(
            origin = %transcript.origin,
            chars = transcript.text.len(),
            "transcript ready"
        );

        let mut report = SummaryReport::new(video_id.to_string());
        let second_language = self.language.counterpart();

        for tier in Tier::ALL {
            on_event(SummaryEvent::SectionStarted {
                tier,
                language: self.language,
                kind: SectionKind::Summary,
            });
            let summary = self
                .generator
                .summarize(&transcript.text, tier, self.language, &mut |fragment: &str| {
                    on_event(SummaryEvent::Fragment(fragment))
                })
                .await?;
            on_event(SummaryEvent::SectionFinished { text: &summary });

            if self.dual_language {
                on_event(SummaryEvent::SectionStarted {
                    tier,
                    language: second_language,
                    kind: SectionKind::Translation,
                });
                let translation = self
                    .generator
                    .translate(&summary, tier, second_language, &mut |fragment: &str| {
                        on_event(SummaryEvent::Fragment(fragment))
                    })
                    .await?;
                on_event(SummaryEvent::SectionFinished { text: &translation });
                report.insert(second_language, tier, translation);
            }

            report.insert(self.language, tier, summary);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::summary::{CompletionRequest, FragmentStream, ModelFamily, Role};
    use crate::core::transcript::{CaptionTrack, TrackList, TranscriptEntry};
    use crate::core::video::VideoId;
    use crate::error::Error;
    use async_trait::async_trait;
    use futures::StreamExt;
    use futures::stream;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone)]
    struct StaticTrack {
        code: &'static str,
        texts: Vec<&'static str>,
    }

    #[async_trait]
    impl CaptionTrack for StaticTrack {
        fn language_code(&self) -> &str {
            self.code
        }

        fn is_generated(&self) -> bool {
            false
        }

        async fn fetch(&self) -> Result<Vec<TranscriptEntry>> {
            Ok(self.texts.iter().map(|t| TranscriptEntry::new(*t)).collect())
        }

        fn translate(&self, _language_code: &str) -> Result<Self> {
            Err(Error::custom("translation unavailable"))
        }
    }

    struct ManualEnglish;

    #[async_trait]
    impl TranscriptSource for ManualEnglish {
        type Track = StaticTrack;

        async fn list_tracks(&self, _video_id: &VideoId) -> Result<TrackList<StaticTrack>> {
            Ok(TrackList {
                manual: vec![StaticTrack {
                    code: "en",
                    texts: vec!["A", "B"],
                }],
                generated: vec![],
            })
        }
    }

    /// Echoes the user prompt back; fails on the call numbered `fail_on`.
    #[derive(Default)]
    struct EchoClient {
        calls: AtomicUsize,
        fail_on: Option<usize>,
    }

    impl EchoClient {
        fn echo(&self, request: &CompletionRequest) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on == Some(call) {
                return Err(Error::custom("rate limited"));
            }
            Ok(request
                .messages
                .iter()
                .find(|m| m.role == Role::User)
                .map(|m| m.content.clone())
                .unwrap_or_default())
        }
    }

    #[async_trait]
    impl CompletionClient for EchoClient {
        async fn complete(&self, request: CompletionRequest) -> Result<String> {
            self.echo(&request)
        }

        async fn complete_stream(&self, request: CompletionRequest) -> Result<FragmentStream> {
            let text = self.echo(&request)?;
            let words: Vec<Result<Option<String>>> = text
                .split_inclusive(' ')
                .map(|w| Ok(Some(w.to_string())))
                .collect();
            Ok(stream::iter(words).boxed())
        }
    }

    fn summarizer(
        client: EchoClient,
        streaming: bool,
        dual_language: bool,
    ) -> Summarizer<ManualEnglish, EchoClient> {
        let generator = SummaryGenerator::new(client, "o3-mini", ModelFamily::Reasoning, streaming);
        Summarizer::new(ManualEnglish, generator, Language::English, dual_language)
    }

    #[tokio::test]
    async fn summarizes_every_tier_in_requested_language() {
        let summarizer = summarizer(EchoClient::default(), true, false);
        let mut fragments = String::new();

        let report = summarizer
            .summarize_video("https://www.youtube.com/watch?v=abc123", &mut |event: SummaryEvent<'_>| {
                if let SummaryEvent::Fragment(f) = event {
                    fragments.push_str(f);
                }
            })
            .await
            .expect("report");

        assert_eq!(report.video_id, "abc123");
        for tier in Tier::ALL {
            let text = report.get(Language::English, tier).expect("summary");
            assert!(!text.is_empty());
            assert!(text.ends_with("\n\nA B"));
        }
        assert!(report.summaries[&Language::Polish].is_empty());
        assert!(fragments.contains(Tier::Complex.prompt(Language::English)));
    }

    #[tokio::test]
    async fn sections_are_reported_in_tier_order() {
        let summarizer = summarizer(EchoClient::default(), false, false);
        let mut started = Vec::new();
        let mut finished = 0;

        summarizer
            .summarize_video("https://youtu.be/abc123", &mut |event: SummaryEvent<'_>| match event {
                SummaryEvent::SectionStarted { tier, .. } => started.push(tier),
                SummaryEvent::SectionFinished { .. } => finished += 1,
                SummaryEvent::Fragment(_) => panic!("buffered mode streamed a fragment"),
            })
            .await
            .expect("report");

        assert_eq!(started, Tier::ALL.to_vec());
        assert_eq!(finished, 3);
    }

    #[tokio::test]
    async fn dual_language_translates_each_summary() {
        let summarizer = summarizer(EchoClient::default(), false, true);
        let report = summarizer
            .summarize_video("https://youtu.be/abc123", &mut |_: SummaryEvent<'_>| {})
            .await
            .expect("report");

        for tier in Tier::ALL {
            let summary = report.get(Language::English, tier).expect("summary");
            assert_eq!(report.get(Language::Polish, tier), Some(summary));
        }
        assert_eq!(summarizer.generator_calls(), 6);
    }

    #[tokio::test]
    async fn failure_on_second_tier_aborts_the_run() {
        let client = EchoClient {
            fail_on: Some(2),
            ..Default::default()
        };
        let summarizer = summarizer(client, true, false);
        let err = summarizer
            .summarize_video("https://youtu.be/abc123", &mut |_: SummaryEvent<'_>| {})
            .await
            .expect_err("second call fails");

        assert!(matches!(err, Error::SummaryGeneration(_)));
        assert_eq!(summarizer.generator_calls(), 2);
    }

    #[tokio::test]
    async fn invalid_url_fails_before_any_request() {
        let summarizer = summarizer(EchoClient::default(), true, false);
        let err = summarizer
            .summarize_video("https://example.com/watch?v=abc", &mut |_: SummaryEvent<'_>| {})
            .await
            .expect_err("invalid URL");

        assert!(matches!(err, Error::InvalidUrl(_)));
        assert_eq!(summarizer.generator_calls(), 0);
    }

    #[test]
    fn report_serializes_with_language_and_tier_keys() {
        let mut report = SummaryReport::new("abc123".into());
        report.insert(Language::English, Tier::Simple, "Short.".into());
        let json = serde_json::to_value(&report).expect("json");
        assert_eq!(json["summaries"]["english"]["simple"], "Short.");
        assert_eq!(json["summaries"]["polish"], serde_json::json!({}));
    }

    impl Summarizer<ManualEnglish, EchoClient> {
        fn generator_calls(&self) -> usize {
            self.generator.client().calls.load(Ordering::SeqCst)
        }
    }
}
