//! Speech Emotion Analysis CLI Application

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use ser_rs::report::{self, ReportFormat};
use ser_rs::session::{analytics, KNOWN_LANGUAGES};
use ser_rs::{
    Config, Emotion, EmotionAnalyzer, FeedbackEntry, FeedbackLedger, HfClassifier, LedgerError,
    RecordingId, Session,
};

/// Speech Emotion Recognition System
#[derive(Parser)]
#[command(name = "ser-rs")]
#[command(about = "Emotion analysis for speech recordings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one or more audio files in a single session
    Analyze {
        /// Audio files to analyze
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Language tag for the session (e.g. en, de, ja)
        #[arg(short, long)]
        language: Option<String>,

        /// Model identifier on the inference service
        #[arg(short, long)]
        model: Option<String>,

        /// API token (overrides config and HUGGING_FACE_API_KEY)
        #[arg(short, long)]
        token: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write the preprocessed waveform next to each source file
        #[arg(long)]
        save_processed: bool,

        /// Scale the last recording's confidence by this factor
        #[arg(long)]
        scale_confidence: Option<f32>,
    },

    /// Record feedback about a prediction in the feedback log
    Feedback {
        /// Recording id the feedback refers to
        id: u64,

        /// Emotion the system predicted
        #[arg(short, long)]
        predicted: Emotion,

        /// Emotion you consider correct
        #[arg(short = 'C', long)]
        corrected: Emotion,

        /// Additional comments
        #[arg(long, default_value = "")]
        comment: String,

        /// Helpfulness rating from 1 to 5
        #[arg(short, long, default_value = "3")]
        rating: u8,
    },

    /// Show aggregates over the feedback log
    FeedbackStats {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List supported language tags
    Languages,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging - quiet by default, use -v for more
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .init();

    // Load configuration
    let mut config = if let Some(ref config_path) = cli.config {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Analyze {
            files,
            language,
            model,
            token,
            format,
            save_processed,
            scale_confidence,
        } => {
            // Apply CLI overrides
            if let Some(language) = language {
                config.session.language = language;
            }
            if let Some(model) = model {
                config.classifier.model = model;
            }
            if let Some(token) = token {
                config.classifier.api_token = Some(token);
            }
            if save_processed {
                config.session.save_processed = true;
            }

            analyze_files(config, files, parse_format(&format), scale_confidence)
        }
        Commands::Feedback {
            id,
            predicted,
            corrected,
            comment,
            rating,
        } => record_feedback(config, id, predicted, corrected, comment, rating),
        Commands::FeedbackStats { format } => show_feedback_stats(config, parse_format(&format)),
        Commands::Languages => list_languages(),
    }
}

fn parse_format(format: &str) -> ReportFormat {
    match format {
        "json" => ReportFormat::Json,
        _ => ReportFormat::Text,
    }
}

/// Run every file through the pipeline in one session
fn analyze_files(
    config: Config,
    files: Vec<PathBuf>,
    format: ReportFormat,
    scale_confidence: Option<f32>,
) -> Result<()> {
    let classifier =
        HfClassifier::new(config.classifier.clone()).context("Failed to create classifier")?;
    info!("Using model {}", classifier.model());

    let analyzer = EmotionAnalyzer::new(&config, classifier);
    let mut session = Session::new(&config.session.language);

    let mut failures = 0u32;
    for file in &files {
        match analyzer.analyze_file(file, &mut session) {
            Ok(id) => {
                if let Some(recording) = session.store().get(id) {
                    match format {
                        ReportFormat::Text => print!("{}", report::format_recording_text(recording)),
                        ReportFormat::Json => {
                            println!("{}", report::format_recording_json(recording))
                        }
                    }
                }
            }
            Err(e) => {
                failures += 1;
                error!("Failed to analyze {}: {}", file.display(), e);
            }
        }
    }

    if let Some(factor) = scale_confidence {
        if let Some(tail) = session.store().last().map(|r| r.id) {
            let confidence = session.store_mut().adjust_confidence(tail, factor)?;
            println!(
                "Adjusted recording {} confidence to {:.1}%",
                tail,
                confidence * 100.0
            );
        }
    }

    if session.store().len() > 1 {
        if let Some(summary) = session.summary() {
            let counts = analytics::distribution(session.store());
            match format {
                ReportFormat::Text => print!("{}", report::format_summary_text(&summary, &counts)),
                ReportFormat::Json => {
                    println!("{}", report::format_summary_json(&summary, &counts))
                }
            }
        }
    }

    if session.store().is_empty() {
        anyhow::bail!("All {} file(s) failed to analyze", failures);
    }
    if failures > 0 {
        anyhow::bail!("{} of {} file(s) failed to analyze", failures, files.len());
    }
    Ok(())
}

/// Append one feedback entry to the ledger
fn record_feedback(
    config: Config,
    id: u64,
    predicted: Emotion,
    corrected: Emotion,
    comment: String,
    rating: u8,
) -> Result<()> {
    let ledger = FeedbackLedger::new(config.feedback.log_path.clone());
    let entry = FeedbackEntry::new(RecordingId(id), predicted, corrected, comment, rating);

    ledger
        .record(&entry)
        .with_context(|| format!("Failed to write feedback to {}", ledger.path().display()))?;

    println!(
        "Recorded feedback for recording {}: predicted {}, corrected {}",
        entry.recording_id, entry.predicted_emotion, entry.corrected_emotion
    );
    Ok(())
}

/// Print aggregates over the feedback log
fn show_feedback_stats(config: Config, format: ReportFormat) -> Result<()> {
    let ledger = FeedbackLedger::new(config.feedback.log_path.clone());

    match ledger.stats() {
        Ok(stats) => match format {
            ReportFormat::Text => print!("{}", report::format_feedback_text(&stats)),
            ReportFormat::Json => println!("{}", report::format_feedback_json(&stats)),
        },
        Err(LedgerError::Empty) => println!("No feedback recorded yet"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// List the language tags a session can be created with
fn list_languages() -> Result<()> {
    println!("Supported languages:");
    for (name, tag) in KNOWN_LANGUAGES {
        println!("  {:<4} {}", tag, name);
    }
    Ok(())
}
