use crate::cli::GenerationArgs;
use crate::core::{Language, ModelFamily};
use crate::error::{Error, Result};
use tracing::warn;

/// Settings for one summarization run, fixed at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub model_family: ModelFamily,
    pub language: Language,
    pub dual_language: bool,
    pub streaming: bool,
}

impl Config {
    pub fn from_args(
        api_key: Option<String>,
        language: Option<&str>,
        generation: &GenerationArgs,
        dual_language: bool,
    ) -> Result<Self> {
        Ok(Self {
            api_key: require_api_key(api_key)?,
            model: generation.model.clone(),
            model_family: generation.model_family,
            language: select_language(language),
            dual_language,
            streaming: !generation.no_stream,
        })
    }
}

pub fn require_api_key(api_key: Option<String>) -> Result<String> {
    match api_key {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(Error::MissingApiKey),
    }
}

/// Unknown selectors fall back to English.
pub fn select_language(selector: Option<&str>) -> Language {
    let Some(selector) = selector else {
        return Language::default();
    };

    Language::from_selector(selector).unwrap_or_else(|| {
        let valid: Vec<&str> = Language::ALL.iter().map(|l| l.selector()).collect();
        warn!(
            "Invalid language parameter: {selector}. Valid options are: {}. Using default language: {}",
            valid.join(", "),
            Language::default()
        );
        Language::default()
    })
}
