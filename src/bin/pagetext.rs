//! Command-line front end: extract readable text from URLs.
//!
//! URLs come from the arguments or, when none are given, one per line on
//! stdin. Reports go to stdout; logs go to stderr (`RUST_LOG` filters them).

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use rs_pagetext::{parse_url_list, Extractor, HttpFetcher, Options};

#[derive(Debug, Parser)]
#[command(name = "pagetext", version, about = "Extract the readable content of web pages")]
struct Args {
    /// URLs to process; read from stdin when omitted
    urls: Vec<String>,

    /// Never look for AMP or print versions
    #[arg(long)]
    no_alt: bool,

    /// Print reports as JSON instead of the text template
    #[arg(long)]
    json: bool,

    /// TOML file with extraction options
    #[arg(long, env = "PAGETEXT_CONFIG")]
    config: Option<PathBuf>,

    /// Number of URLs processed at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-request timeout for primary pages, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Retries after a failed request
    #[arg(long)]
    retries: Option<usize>,
}

fn load_options(args: &Args) -> Result<Options, Box<dyn Error>> {
    let mut options = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            toml::from_str(&raw)?
        }
        None => Options::default(),
    };

    if args.no_alt {
        options.prefer_alt = false;
    }
    if let Some(n) = args.concurrency {
        options.concurrency = n;
    }
    if let Some(secs) = args.timeout_secs {
        options.fetch.timeout_secs = secs;
    }
    if let Some(n) = args.retries {
        options.fetch.max_retries = n;
    }
    Ok(options)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let options = load_options(&args)?;

    let urls = if args.urls.is_empty() {
        let mut raw = String::new();
        tokio::io::stdin().read_to_string(&mut raw).await?;
        parse_url_list(&raw)
    } else {
        args.urls.clone()
    };

    let fetcher = HttpFetcher::new(&options.fetch)?;
    let extractor = Extractor::new(options)?;

    if args.json {
        let reports = extractor.process_reports(&fetcher, &urls).await?;
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print!("{}", extractor.process(&fetcher, &urls).await?);
    }
    Ok(())
}
