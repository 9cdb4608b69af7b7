use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Display, From)]
pub enum Error {
    #[display("Invalid YouTube URL: {_0}")]
    InvalidUrl(String),

    #[display("Could not retrieve transcript list for video {video_id}: {reason}")]
    TranscriptListUnavailable { video_id: String, reason: String },

    #[display("All transcript retrieval methods failed:{}", bullet_list(failures))]
    NoTranscriptAvailable { failures: Vec<String> },

    #[display("Transcript for video {video_id} was retrieved but contained no text")]
    EmptyTranscript { video_id: String },

    #[display("Error generating summary: {_0}")]
    SummaryGeneration(String),

    #[display("OpenAI API key not found. Set OPENAI_API_KEY or pass --api-key.")]
    MissingApiKey,

    #[display("{_0}")]
    Custom(String),

    #[from]
    #[display("{_0}")]
    Io(std::io::Error),

    #[from]
    #[display("{_0}")]
    Json(serde_json::Error),
}

impl Error {
    pub fn custom(val: impl std::fmt::Display) -> Self {
        Self::Custom(val.to_string())
    }

    pub fn generation(val: impl std::fmt::Display) -> Self {
        Self::SummaryGeneration(val.to_string())
    }
}

impl std::error::Error for Error {}

fn bullet_list(items: &[String]) -> String {
    items.iter().map(|item| format!("\n- {item}")).collect()
}
