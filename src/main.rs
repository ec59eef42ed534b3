use clap::{ArgAction, Parser};
use fetchall_rs::output::{self, OutputFormat};
use fetchall_rs::{
    CancelHandle, ConfigOverrides, DispatchError, Dispatcher, DispatcherConfig, Feeder,
    HttpTransport, LineFeeder, ListFeeder,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "fetchall")]
#[command(about = "Fetch URLs in parallel and report their times and sizes", long_about = None)]
struct Args {
    /// URLs to fetch
    targets: Vec<String>,

    /// Read targets from a file, one per line ("-" for stdin)
    #[arg(short, long, conflicts_with = "targets")]
    input: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of fetches in flight (unbounded by default)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Per-target timeout in milliseconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Cancel everything still running after this many milliseconds
    #[arg(long)]
    deadline: Option<u64>,

    #[arg(short, long)]
    retries: Option<u32>,

    /// Base delay between retries in milliseconds
    #[arg(long)]
    retry_delay: Option<u64>,

    /// Report results in submission order instead of completion order
    #[arg(long)]
    ordered: bool,

    /// Exit with status 1 if any target failed
    #[arg(long)]
    fail_on_error: bool,

    /// Count the body of non-2xx responses instead of failing
    #[arg(long)]
    accept_any_status: bool,

    #[arg(long)]
    json: bool,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn log_level(&self) -> Level {
        match (self.quiet, self.verbose) {
            (true, _) => Level::ERROR,
            (false, 0) => Level::WARN,
            (false, 1) => Level::INFO,
            (false, 2) => Level::DEBUG,
            (false, _) => Level::TRACE,
        }
    }

    fn load_config(&self) -> Result<DispatcherConfig, DispatchError> {
        let base = match &self.config {
            Some(path) => DispatcherConfig::from_json_file(path)?,
            None => DispatcherConfig::default(),
        };

        ConfigOverrides {
            max_concurrency: self.concurrency,
            timeout_ms: self.timeout,
            deadline_ms: self.deadline,
            retries: self.retries,
            retry_delay_ms: self.retry_delay,
            ordered: self.ordered,
            fail_on_error: self.fail_on_error,
            accept_any_status: self.accept_any_status,
        }
        .apply(base)
    }

    async fn feeder(&self) -> Result<Box<dyn Feeder>, DispatchError> {
        match &self.input {
            Some(path) => Ok(Box::new(LineFeeder::from_path(path).await?)),
            None => Ok(Box::new(ListFeeder::new(self.targets.clone()))),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, DispatchError> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(args.log_level())
        .init();

    let config = Arc::new(args.load_config()?);
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let transport = Arc::new(HttpTransport::new(&config)?);
    let dispatcher = Dispatcher::new(transport, config.clone());

    let cancel = Arc::new(CancelHandle::new());
    let mut signal = cancel.signal();

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling outstanding fetches");
                cancel.cancel();
            }
        }
    });

    if let Some(ms) = config.deadline_ms {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            info!("Deadline of {} ms reached, cancelling", ms);
            cancel.cancel();
        });
    }

    let feeder = tokio::select! {
        _ = signal.cancelled() => {
            warn!("Cancelled while reading targets");
            return Ok(ExitCode::FAILURE);
        }
        feeder = args.feeder() => feeder?,
    };

    let report = dispatcher
        .dispatch_with(feeder, signal, |result| {
            match output::render_result(result, format) {
                Ok(line) => println!("{}", line),
                Err(e) => error!("Failed to render result for {}: {}", result.target(), e),
            }
        })
        .await;

    println!("{}", output::render_summary(&report, format)?);

    if config.run_failed(&report) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
