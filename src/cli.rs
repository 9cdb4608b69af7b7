use crate::core::{Language, ModelFamily, SectionKind, Tier};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vidsum")]
#[command(about = "YouTube transcript summarizer")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a video at three levels of detail
    Summarize {
        /// YouTube watch URL or youtu.be short link
        url: String,

        /// Summary language: eng or pl (defaults to eng)
        language: Option<String>,

        #[command(flatten)]
        generation: GenerationArgs,

        /// Also translate every summary into the other language
        #[arg(long)]
        dual: bool,

        /// Print the collected summaries as JSON when done
        #[arg(long)]
        json: bool,
    },

    /// Print the transcript that would be summarized
    Transcript {
        /// YouTube watch URL or youtu.be short link
        url: String,

        /// Transcript language: eng or pl (defaults to eng)
        language: Option<String>,

        /// Prefix every line with its time range
        #[arg(long)]
        timestamps: bool,
    },

    /// List models available to the API key
    Models,
}

#[derive(Args, Debug, Clone)]
pub struct GenerationArgs {
    /// Model used for summaries
    #[arg(long, env = "OPENAI_MODEL", default_value = "o3-mini")]
    pub model: String,

    /// How the model accepts sampling parameters
    #[arg(long, env = "OPENAI_MODEL_FAMILY", value_enum, default_value_t = ModelFamily::Reasoning)]
    pub model_family: ModelFamily,

    /// Wait for each summary instead of streaming it
    #[arg(long)]
    pub no_stream: bool,
}

pub fn section_heading(tier: Tier, language: Language, kind: SectionKind) -> String {
    let title = match (tier, language) {
        (Tier::Simple, Language::English) => "Simple Summary",
        (Tier::Moderate, Language::English) => "Moderate Summary",
        (Tier::Complex, Language::English) => "Complex Summary",
        (Tier::Simple, Language::Polish) => "Podsumowanie Proste",
        (Tier::Moderate, Language::Polish) => "Podsumowanie Średnio Zaawansowane",
        (Tier::Complex, Language::Polish) => "Podsumowanie Złożone",
    };

    match (kind, language) {
        (SectionKind::Summary, _) => title.to_string(),
        (SectionKind::Translation, Language::English) => format!("{title} (translation)"),
        (SectionKind::Translation, Language::Polish) => format!("{title} (tłumaczenie)"),
    }
}
