use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use log::error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use timeline::fetch::{fetch_csv, read_csv_file};
use timeline::{AppConfig, Error, Filter, Result, Timeline, ALL};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Timeline,
}

/// Supervisory meeting timeline from a CSV export.
#[derive(Debug, Parser)]
#[command(name = "meetings", version)]
struct Cli {
    /// Published CSV export to fetch
    #[arg(long, env = "MEETINGS_CSV_URL")]
    url: Option<String>,

    /// Local CSV file; wins over --url and the environment
    #[arg(long)]
    file: Option<PathBuf>,

    /// TOML file with `source_url` and a `[columns]` table
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = ALL)]
    project: String,

    #[arg(long, default_value = ALL)]
    student: String,

    /// Earliest meeting day to keep (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Latest meeting day to keep (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Case-insensitive text to search for
    #[arg(long, default_value = "")]
    query: String,

    #[arg(long, value_enum, default_value_t = Format::Timeline)]
    format: Format,

    /// Print the project and student choices and exit
    #[arg(long)]
    list_options: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Source<'a> {
    File(&'a Path),
    Url(&'a str),
}

/// `--file`, then `--url` (or its env var), then `source_url` from config.
fn pick_source<'a>(cli: &'a Cli, config: &'a AppConfig) -> Result<Source<'a>> {
    if let Some(path) = &cli.file {
        return Ok(Source::File(path));
    }
    cli.url
        .as_deref()
        .or(config.source_url.as_deref())
        .map(Source::Url)
        .ok_or_else(|| {
            Error::Config("no data source: pass --url, --file or set source_url".to_string())
        })
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let text = match pick_source(&cli, &config)? {
        Source::File(path) => read_csv_file(path)?,
        Source::Url(url) => fetch_csv(url)?,
    };

    let mut timeline = Timeline::new(config.columns);
    timeline.load_csv(text.as_bytes())?;

    let stdout = io::stdout();
    if cli.list_options {
        let mut out = stdout.lock();
        writeln!(out, "projects: {}", timeline.project_options().join(", "))?;
        writeln!(out, "students: {}", timeline.student_options().join(", "))?;
        return Ok(());
    }

    let filter = Filter {
        project: cli.project,
        student: cli.student,
        from: cli.from,
        to: cli.to,
        query: cli.query,
    };
    match cli.format {
        Format::Csv => timeline.write_results(&filter, stdout.lock()),
        Format::Timeline => timeline.write_timeline(&filter, stdout.lock()),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        error!("{}", err);
        std::process::exit(1);
    }
}
