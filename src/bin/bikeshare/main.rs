//! `bikeshare`: explore US bikeshare trip data from the command line.
//!
//! ```bash
//! # One-shot
//! $ bikeshare --data-dir data --city chicago --month march --day friday
//! $ bikeshare --data-dir data --city washington --format json
//!
//! # Interactive prompts (no --city)
//! $ BIKESHARE_DATA_DIR=data bikeshare
//! ```

mod prompt;
mod render;

use std::io::{self, BufRead, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use bikeshare_explorer::execution::{ExecutionEngine, ExecutionOptions, LogExecutionObserver};
use bikeshare_explorer::ingestion::{
    load_city, CompositeObserver, FileObserver, LoadObserver, LoadOptions, LoadRequest,
    LogObserver,
};
use bikeshare_explorer::processing::{DayFilter, MonthFilter};
use bikeshare_explorer::types::City;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "bikeshare", version, about = "Explore US bikeshare trip data")]
struct Args {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// chicago, new york city or washington; omit to be prompted
    #[arg(long)]
    city: Option<String>,

    /// january..june or all
    #[arg(long, default_value = "all")]
    month: String,

    /// monday..sunday or all
    #[arg(long, default_value = "all")]
    day: String,

    #[arg(long, value_enum, default_value_t = OutputFormatArg::Text)]
    format: OutputFormatArg,

    /// Run the analyses one after another instead of concurrently
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Worker threads for the analyses (default: available parallelism)
    #[arg(long)]
    threads: Option<usize>,

    /// Rows per chunk when filtering in parallel
    #[arg(long, default_value = "4096")]
    chunk_size: NonZeroUsize,

    /// Print elapsed time per analysis
    #[arg(long, default_value_t = false)]
    timing: bool,

    /// Also append load outcomes to this file
    #[arg(long = "load-log")]
    load_log: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut observers: Vec<Arc<dyn LoadObserver>> = vec![Arc::new(LogObserver)];
    if let Some(path) = &args.load_log {
        observers.push(Arc::new(FileObserver::new(path)));
    }
    let load_opts = LoadOptions {
        observer: Some(Arc::new(CompositeObserver::new(observers))),
        ..LoadOptions::with_data_dir(&args.data_dir)
    };
    let engine = ExecutionEngine::new(ExecutionOptions {
        num_threads: args.threads.filter(|n| *n > 0),
        parallel: !args.sequential,
        chunk_size: args.chunk_size.get(),
    })
    .context("starting analysis thread pool")?
    .with_observer(Arc::new(LogExecutionObserver));

    match args.city.as_deref() {
        Some(city) => {
            let request = LoadRequest {
                city: city.parse()?,
                month: args.month.parse()?,
                day: args.day.parse()?,
                options: load_opts,
            };
            run_once(&engine, &request, args.format, args.timing)
        }
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_interactive(&engine, load_opts, &mut stdin.lock(), &mut stdout.lock())
        }
    }
}

fn run_once(
    engine: &ExecutionEngine,
    request: &LoadRequest,
    format: OutputFormatArg,
    timing: bool,
) -> Result<()> {
    let loaded = load_city(request.city, &request.options).with_context(|| {
        format!(
            "loading {} from {}",
            request.city,
            request.options.dataset_path(request.city).display()
        )
    })?;
    let table = engine.filter(&loaded, request.month, request.day);
    let report = engine.run_all(&table);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormatArg::Text => {
            render::write_header(&mut out, request.city, request.month, request.day, report.rows)?;
            render::write_report(&mut out, &report, timing)?;
        }
        OutputFormatArg::Json => {
            let mut json = report.to_json()?;
            json["city"] = serde_json::to_value(request.city)?;
            json["month"] = request.month.to_string().into();
            json["day"] = request.day.to_string().into();
            writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        }
    }
    Ok(())
}

/// Prompt, analyse, and offer a restart until the user declines or input ends.
fn run_interactive<R: BufRead, W: Write>(
    engine: &ExecutionEngine,
    load_opts: LoadOptions,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    loop {
        let Some((city, month, day)) = prompt::get_filters(input, out)? else {
            return Ok(());
        };
        writeln!(out, "{}", render::RULE)?;
        analyse_interactive(engine, &load_opts, city, month, day, out)?;

        if !prompt::ask_restart(input, out)? {
            return Ok(());
        }
    }
}

fn analyse_interactive<W: Write>(
    engine: &ExecutionEngine,
    load_opts: &LoadOptions,
    city: City,
    month: MonthFilter,
    day: DayFilter,
    out: &mut W,
) -> Result<()> {
    match load_city(city, load_opts) {
        Ok(loaded) => {
            let table = engine.filter(&loaded, month, day);
            let report = engine.run_all(&table);
            render::write_header(out, city, month, day, report.rows)?;
            render::write_report(out, &report, true)?;
        }
        Err(e) => {
            log::warn!("load failed: {e}");
            writeln!(out, "Could not load data for {city}: {e}")?;
        }
    }
    Ok(())
}
