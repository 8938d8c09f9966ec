use anyhow::Context;
use clap::{Parser, ValueEnum};
use refetch::{derive_filename, parse_url, Backoff, FetchConfig, Fetcher, FileSink, Sink, DEFAULT_MAX_RETRIES};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "refetch")]
#[command(about = "Download a file over HTTP, resuming an earlier partial download", long_about = None)]
#[command(version)]
struct Args {
    /// URL of the file to download
    url: String,

    /// Retries allowed after a timeout or dropped connection
    #[arg(short, long, default_value_t = DEFAULT_MAX_RETRIES)]
    retries: u32,

    /// Timeout for each HTTP request, body included (e.g. "30s", "5m")
    #[arg(long, default_value = "5m", value_parser = humantime::parse_duration)]
    timeout: Duration,

    /// Delay strategy between retries
    #[arg(long, value_enum, default_value_t = BackoffKind::None)]
    backoff: BackoffKind,

    /// First delay for --backoff fixed or exponential
    #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
    backoff_delay: Duration,

    /// Upper bound for exponential backoff delays
    #[arg(long, default_value = "1m", value_parser = humantime::parse_duration)]
    backoff_max: Duration,

    /// Randomise backoff delays
    #[arg(long)]
    jitter: bool,

    /// Destination file (defaults to the last segment of the URL path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BackoffKind {
    None,
    Fixed,
    Exponential,
}

impl Args {
    fn backoff(&self) -> Backoff {
        match self.backoff {
            BackoffKind::None => Backoff::None,
            BackoffKind::Fixed => Backoff::Fixed(self.backoff_delay),
            BackoffKind::Exponential => Backoff::Exponential {
                base: self.backoff_delay,
                max: self.backoff_max,
            },
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Logs go to stderr; stdout only carries the final size line
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("refetch={}", log_level))),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok((path, size)) => println!("{} {} bytes", path.display(), size),
        Err(e) => {
            eprintln!("refetch: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> anyhow::Result<(PathBuf, u64)> {
    let url = parse_url(&args.url)?;
    let path = match &args.output {
        Some(path) => path.clone(),
        None => PathBuf::from(derive_filename(&url)?),
    };

    let config = FetchConfig {
        max_retries: args.retries,
        timeout: args.timeout,
        backoff: args.backoff(),
        jitter: args.jitter,
        ..FetchConfig::default()
    };
    let fetcher = Fetcher::new(config)?;

    let mut sink = FileSink::open_append(&path)
        .await
        .with_context(|| format!("cannot open {}", path.display()))?;
    let existing = sink
        .current_len()
        .await
        .with_context(|| format!("cannot stat {}", path.display()))?;
    info!(%url, file = %path.display(), existing, "Starting download");

    fetcher.fetch_url(&url, &mut sink).await?;

    let size = sink
        .current_len()
        .await
        .with_context(|| format!("cannot stat {}", path.display()))?;
    info!(file = %path.display(), size, "Download complete");
    Ok((path, size))
}
