use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quran_acquire::{chapters, output, AcquireConfig, ApiClient, ChapterSelection, Downloader};

#[derive(Parser)]
#[command(name = "quran")]
#[command(about = "Download Quran text, word-by-word data, and translations as per-surah JSON")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    /// API base URL (overrides the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// TOML config file (translations, word languages, throttle delays)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Download one surah, a range of surahs, or all of them as JSON files
    Download {
        /// Single surah id (1-114)
        #[arg(long, conflicts_with_all = ["all", "from", "to"])]
        surah: Option<u32>,

        /// Download all 114 surahs
        #[arg(long, conflicts_with_all = ["from", "to"])]
        all: bool,

        /// First surah id of a range (default 1)
        #[arg(long)]
        from: Option<u32>,

        /// Last surah id of a range, inclusive (default 114)
        #[arg(long)]
        to: Option<u32>,

        /// Output directory for surah JSON files
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// List all surahs
    List {
        /// Also write the listing to this JSON file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// List available translations
    Translations {
        /// Only show translations whose language contains this text (e.g., "indo")
        #[arg(long)]
        language: Option<String>,
    },

    /// Fetch any API path and print the JSON response
    Fetch {
        /// API path relative to the base URL (e.g., "/chapters/1/info")
        #[arg(long)]
        path: String,

        /// Query parameter as key=value; repeatable
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// Validate a downloaded surah JSON file
    Validate {
        /// Path to the surah JSON file
        file: String,
    },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
enum CliError {
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}

fn chapter_selection(
    surah: Option<u32>,
    all: bool,
    from: Option<u32>,
    to: Option<u32>,
) -> Result<ChapterSelection, CliError> {
    match (surah, all, from, to) {
        (Some(id), _, _, _) => Ok(ChapterSelection::One(id)),
        (None, true, _, _) => Ok(ChapterSelection::All),
        (None, false, None, None) => {
            Err(CliError::MissingArgument("--surah, --all, or --from/--to"))
        }
        (None, false, from, to) => Ok(ChapterSelection::Range {
            from: from.unwrap_or(1),
            to: to.unwrap_or(114),
        }),
    }
}

fn load_config(path: Option<&PathBuf>, base_url: Option<String>) -> Result<AcquireConfig> {
    let mut config = match path {
        Some(path) => AcquireConfig::from_toml_file(path)?,
        None => AcquireConfig::default(),
    };
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the HTTP stack quiet unless explicitly asked for via RUST_LOG
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,hyper_util=info,reqwest=info,rustls=info",
        LogLevel::Trace => "trace,hyper_util=info,reqwest=info,rustls=info",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    let config = load_config(cli.config.as_ref(), cli.base_url)?;

    match cli.command {
        Commands::Download {
            surah,
            all,
            from,
            to,
            output,
        } => {
            let selection = chapter_selection(surah, all, from, to)?;
            tracing::info!(selection = ?selection, output = %output.display(), "Downloading");
            let downloader = Downloader::new(config, &output)?;
            let report = downloader.download(selection).await?;

            for summary in &report.written {
                println!(
                    "{:>3}. {:<20} {:>4} ayahs  {}",
                    summary.chapter_id,
                    summary.name,
                    summary.ayahs,
                    summary.words
                        .iter()
                        .map(|(lang, n)| format!("{lang}: {n} words"))
                        .collect::<Vec<_>>()
                        .join(", "),
                );
            }
            for failure in &report.failed {
                eprintln!(
                    "{:>3}. {:<20} FAILED: {}",
                    failure.chapter_id, failure.name, failure.error
                );
            }
            tracing::info!(
                written = report.written.len(),
                failed = report.failed.len(),
                ayahs = report.total_ayahs(),
                path = %output.display(),
                "Download complete"
            );
        }
        Commands::List { save } => {
            let client = ApiClient::from_config(&config)?;
            let resolver = quran_acquire::ChapterResolver::new(client);
            let chapters = resolver.list_chapters().await?;
            for c in chapters {
                println!(
                    "{:>3}. {:<20} {:<24} {:>3} ayahs  {:<7}  {}",
                    c.id,
                    c.name_simple,
                    c.translated_name.name,
                    c.verses_count,
                    c.revelation_place,
                    c.name_arabic,
                );
            }
            if let Some(path) = save {
                output::write_chapter_index(chapters, &path)?;
            }
        }
        Commands::Translations { language } => {
            let client = ApiClient::from_config(&config)?;
            let catalog = chapters::list_translations(&client).await?;
            let matches =
                quran_model::filter_by_language(&catalog, language.as_deref().unwrap_or(""));
            for t in &matches {
                println!("{:>4}  {:<12} {:<45} {}", t.id, t.language_name, t.name, t.author_name);
            }
            tracing::info!(shown = matches.len(), total = catalog.len(), "Listed translations");
        }
        Commands::Fetch { path, params } => {
            let client = ApiClient::from_config(&config)?;
            let body = client.get(&path, &params).await?;
            let json = serde_json::to_string_pretty(&body).context("Failed to format response")?;
            println!("{json}");
        }
        Commands::Validate { file } => {
            tracing::info!(file = %file, "Validating");
            quran_validate::validate(&file)?;
        }
    }

    Ok(())
}
