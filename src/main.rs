mod cli;
mod config;
mod core;
mod error;

use crate::cli::{Cli, Commands, section_heading};
use crate::config::{Config, require_api_key, select_language};
use crate::core::{
    OpenAiClient, SummaryEvent, SummaryGenerator, Summarizer, TranscriptResolver,
    YoutubeTranscripts, extract_video_id,
};
use crate::error::Result;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "vidsum=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Summarize {
            url,
            language,
            generation,
            dual,
            json,
        } => {
            let config = Config::from_args(cli.api_key, language.as_deref(), &generation, dual)?;
            run_summarize(&url, &config, json).await
        }
        Commands::Transcript {
            url,
            language,
            timestamps,
        } => run_transcript(&url, language.as_deref(), timestamps).await,
        Commands::Models => run_models(cli.api_key).await,
    }
}

async fn run_summarize(url: &str, config: &Config, json: bool) -> Result<()> {
    println!("Summarizing video: {url}");
    println!("Language: {}", config.language.name());

    let generator = SummaryGenerator::new(
        OpenAiClient::new(&config.api_key),
        config.model.clone(),
        config.model_family,
        config.streaming,
    );
    let summarizer = Summarizer::new(
        YoutubeTranscripts::new()?,
        generator,
        config.language,
        config.dual_language,
    );

    let mut stdout = io::stdout();
    let mut write_error = None;
    let report = summarizer
        .summarize_video(url, &mut |event: SummaryEvent<'_>| {
            if let Err(e) = render_event(&mut stdout, event, config.streaming) {
                write_error.get_or_insert(e);
            }
        })
        .await?;

    if let Some(e) = write_error {
        return Err(e.into());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

async fn run_transcript(url: &str, language: Option<&str>, timestamps: bool) -> Result<()> {
    let video_id = extract_video_id(url)?;
    let language = select_language(language);

    let resolver = TranscriptResolver::new(YoutubeTranscripts::new()?);
    let transcript = resolver.resolve(&video_id, language).await?;
    tracing::info!("Transcript source: {}", transcript.origin);

    if timestamps {
        for line in transcript.timed_lines() {
            println!("{line}");
        }
    } else {
        println!("{}", transcript.text);
    }

    Ok(())
}

async fn run_models(api_key: Option<String>) -> Result<()> {
    let client = OpenAiClient::new(&require_api_key(api_key)?);
    let models = client.list_models().await?;

    println!("\nAvailable OpenAI Models:");
    println!("=======================");
    for model in models {
        println!("- {model}");
    }

    Ok(())
}

fn render_event(out: &mut impl Write, event: SummaryEvent<'_>, streaming: bool) -> io::Result<()> {
    match event {
        SummaryEvent::SectionStarted {
            tier,
            language,
            kind,
        } => writeln!(out, "\n=== {} ===", section_heading(tier, language, kind)),
        SummaryEvent::Fragment(fragment) => {
            write!(out, "{fragment}")?;
            out.flush()
        }
        SummaryEvent::SectionFinished { text } => {
            if !streaming {
                write!(out, "{}", text.trim())?;
            }
            writeln!(out, "\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::render_event;
    use crate::core::{Language, SectionKind, SummaryEvent, Tier};

    fn render(events: &[SummaryEvent<'_>], streaming: bool) -> String {
        let mut out = Vec::new();
        for event in events {
            render_event(&mut out, *event, streaming).expect("write");
        }
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn streamed_sections_print_fragments_once() {
        let output = render(
            &[
                SummaryEvent::SectionStarted {
                    tier: Tier::Simple,
                    language: Language::English,
                    kind: SectionKind::Summary,
                },
                SummaryEvent::Fragment("Short "),
                SummaryEvent::Fragment("summary."),
                SummaryEvent::SectionFinished {
                    text: "Short summary.",
                },
            ],
            true,
        );
        assert_eq!(output, "\n=== Simple Summary ===\nShort summary.\n\n");
    }

    #[test]
    fn buffered_sections_print_final_text() {
        let output = render(
            &[
                SummaryEvent::SectionStarted {
                    tier: Tier::Complex,
                    language: Language::Polish,
                    kind: SectionKind::Summary,
                },
                SummaryEvent::SectionFinished {
                    text: " Analiza. ",
                },
            ],
            false,
        );
        assert_eq!(output, "\n=== Podsumowanie Złożone ===\nAnaliza.\n\n");
    }
}
