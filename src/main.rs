// Command-line entry point for astdot.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use astdot::application::RenderUsecase;
use astdot::config::{RawSettings, Settings};
use astdot::domain::{IdScheme, InputFormat, OutputFormat};
use astdot::error::RenderError;
use astdot::exitcode;
use astdot::infrastructure::input_loader::InputLoader;
use astdot::infrastructure::producer_for;
use astdot::ports::tree_exporter::exporter_for;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Render a syntax tree as a Graphviz DOT graph
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file; `-` or omitted reads standard input
    input: Option<PathBuf>,

    /// Input notation (inferred from the file extension when omitted)
    #[arg(short, long, value_enum)]
    input_format: Option<InputFormat>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Node identifier scheme for DOT output
    #[arg(long, value_enum)]
    ids: Option<IdScheme>,

    /// Output file path (default: standard output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => RawSettings::load(path)?,
            None => RawSettings::default(),
        };
        let flags = RawSettings {
            ids: self.ids,
            format: self.format,
            input_format: self.input_format,
        };
        Ok(Settings::resolve(file.merge(flags)))
    }
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);
    std::process::exit(run(&cli));
}

fn fail(code: i32, err: anyhow::Error) -> i32 {
    eprintln!("Error: {:#}", err);
    code
}

fn run(cli: &Cli) -> i32 {
    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => return fail(exitcode::USAGE, e),
    };
    let input = cli.input.as_deref();
    let src = match InputLoader::load(input) {
        Ok(src) => src,
        Err(e) => return fail(exitcode::NOINPUT, e),
    };

    let input_format = settings.input_format_for(input);
    tracing::info!(
        input = input_format.name(),
        output = settings.format.name(),
        ids = %settings.ids,
        "rendering"
    );
    let producer = producer_for(input_format, src);
    let exporter = exporter_for(settings.format, settings.ids);
    let usecase = RenderUsecase {
        producer: producer.as_ref(),
        exporter: exporter.as_ref(),
    };

    // Render fully before touching the destination so a failed parse
    // leaves no output behind.
    let text = match usecase.render_to_string() {
        Ok(text) => text,
        Err(RenderError::Producer(e)) => return fail(exitcode::DATAERR, e.into()),
        Err(e) => return fail(exitcode::IOERR, e.into()),
    };
    match write_output(cli.output.as_deref(), &text) {
        Ok(()) => exitcode::OK,
        Err(e) => fail(exitcode::IOERR, e),
    }
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write output {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = text.len(), "output written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write standard output")?;
        }
    }
    Ok(())
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG directives refine the -d level.
    let env_filter = EnvFilter::builder()
        .with_default_directive(filter.into())
        .from_env_lossy();

    // Logs go to stderr; stdout carries the rendered graph.
    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter))
        .init();
}
