use crate::core::language::Language;
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use serde::Serialize;

const TEMPERATURE: f32 = 0.7;
const SUMMARY_SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes content.";
const TRANSLATION_SYSTEM_PROMPT: &str = "You are a helpful assistant that translates content.";

/// Summary verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Simple,
    Moderate,
    Complex,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Simple, Tier::Moderate, Tier::Complex];

    pub fn prompt(self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Simple, Language::English) => {
                "Provide a brief, simple overview of the main points in 2-3 sentences:"
            }
            (Self::Simple, Language::Polish) => {
                "Przedstaw krótkie podsumowanie głównych punktów w 2-3 zdaniach:"
            }
            (Self::Moderate, Language::English) => {
                "Create a detailed summary that covers the key points and important details in 4-6 sentences:"
            }
            (Self::Moderate, Language::Polish) => {
                "Stwórz szczegółowe podsumowanie obejmujące kluczowe punkty i ważne detale w 4-6 zdaniach:"
            }
            (Self::Complex, Language::English) => {
                "Generate a comprehensive analysis including main themes, key arguments, and important details. Include any relevant context and implications:"
            }
            (Self::Complex, Language::Polish) => {
                "Stwórz kompleksową analizę zawierającą główne tematy, kluczowe argumenty i ważne szczegóły. Uwzględnij odpowiedni kontekst i implikacje:"
            }
        }
    }

    /// Output token budget. Complex analyses get more room when streamed.
    pub fn token_budget(self, streaming: bool) -> u32 {
        match self {
            Self::Simple | Self::Moderate => 1000,
            Self::Complex if streaming => 4000,
            Self::Complex => 2000,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
        })
    }
}

/// Family of the configured model; decides how sampling parameters are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModelFamily {
    /// Reasoning models (o-series): no temperature, `max_completion_tokens`.
    Reasoning,
    /// Regular chat models: `temperature` and `max_tokens`.
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCapabilities {
    pub uses_completion_token_field: bool,
    pub supports_temperature: bool,
}

impl ModelFamily {
    pub fn capabilities(self) -> ModelCapabilities {
        match self {
            Self::Reasoning => ModelCapabilities {
                uses_completion_token_field: true,
                supports_temperature: false,
            },
            Self::Standard => ModelCapabilities {
                uses_completion_token_field: false,
                supports_temperature: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLimit {
    MaxCompletionTokens(u32),
    MaxTokens(u32),
}

/// Transport-independent chat completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub temperature: Option<f32>,
    pub token_limit: TokenLimit,
}

pub type FragmentStream = BoxStream<'static, Result<Option<String>>>;

/// Text-generation service.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Content fragments in arrival order; `None` for chunks without content.
    async fn complete_stream(&self, request: CompletionRequest) -> Result<FragmentStream>;
}

#[derive(Debug, Clone, Copy)]
pub struct SummaryRequest<'a> {
    pub text: &'a str,
    pub tier: Tier,
    pub language: Language,
    pub streaming: bool,
}

pub struct SummaryGenerator<C> {
    client: C,
    model: String,
    capabilities: ModelCapabilities,
    streaming: bool,
}

impl<C: CompletionClient> SummaryGenerator<C> {
    pub fn new(client: C, model: impl Into<String>, family: ModelFamily, streaming: bool) -> Self {
        Self {
            client,
            model: model.into(),
            capabilities: family.capabilities(),
            streaming,
        }
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &C {
        &self.client
    }

    pub fn summary_request(&self, request: &SummaryRequest<'_>) -> CompletionRequest {
        let system = format!(
            "{SUMMARY_SYSTEM_PROMPT} Respond in {}.",
            request.language.name()
        );
        let user = format!("{}\n\n{}", request.tier.prompt(request.language), request.text);
        self.completion_request(system, user, request)
    }

    pub fn translation_request(&self, request: &SummaryRequest<'_>) -> CompletionRequest {
        let system = format!(
            "{TRANSLATION_SYSTEM_PROMPT} Translate the user's text into {}, preserving its structure.",
            request.language.name()
        );
        self.completion_request(system, request.text.to_string(), request)
    }

    fn completion_request(
        &self,
        system: String,
        user: String,
        request: &SummaryRequest<'_>,
    ) -> CompletionRequest {
        let budget = request.tier.token_budget(request.streaming);
        let token_limit = if self.capabilities.uses_completion_token_field {
            TokenLimit::MaxCompletionTokens(budget)
        } else {
            TokenLimit::MaxTokens(budget)
        };

        CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: system,
                },
                ChatMessage {
                    role: Role::User,
                    content: user,
                },
            ],
            stream: request.streaming,
            temperature: self.capabilities.supports_temperature.then_some(TEMPERATURE),
            token_limit,
        }
    }

    /// Summarizes `text` at the given tier. In streaming mode every fragment is
    /// passed to `on_fragment` as it arrives.
    pub async fn summarize(
        &self,
        text: &str,
        tier: Tier,
        language: Language,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String> {
        let request = self.summary_request(&SummaryRequest {
            text,
            tier,
            language,
            streaming: self.streaming,
        });
        self.generate(request, on_fragment).await
    }

    /// Translates an already generated summary into `target`.
    pub async fn translate(
        &self,
        text: &str,
        tier: Tier,
        target: Language,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String> {
        let request = self.translation_request(&SummaryRequest {
            text,
            tier,
            language: target,
            streaming: self.streaming,
        });
        self.generate(request, on_fragment).await
    }

    async fn generate(
        &self,
        request: CompletionRequest,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String> {
        if !request.stream {
            return self.client.complete(request).await.map_err(as_generation_error);
        }

        let mut stream = self
            .client
            .complete_stream(request)
            .await
            .map_err(as_generation_error)?;

        let mut text = String::new();
        while let Some(fragment) = stream.next().await {
            if let Some(fragment) = fragment.map_err(as_generation_error)? {
                on_fragment(&fragment);
                text.push_str(&fragment);
            }
        }
        Ok(text)
    }
}

fn as_generation_error(err: Error) -> Error {
    match err {
        Error::SummaryGeneration(_) => err,
        other => Error::generation(other),
    }
}
