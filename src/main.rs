use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use xorsweep::{sweep_file, Charset, SweepOptions};

/// Version info from build.rs
const VERSION: &str = env!("XORSWEEP_VERSION");
const PROFILE: &str = env!("XORSWEEP_PROFILE");
const GIT_HASH: &str = env!("XORSWEEP_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} ({})", PROFILE, VERSION, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "xorsweep")]
#[command(author, about = "Find lines encrypted with a single-byte XOR key", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// File of hex-encoded lines
    #[arg(required_unless_present = "version")]
    file: Option<PathBuf>,

    /// Number of work units, each scanned on its own thread
    #[arg(short, long, default_value_t = xorsweep::config::DEFAULT_WORKERS)]
    workers: usize,

    /// Stop waiting for workers after this many seconds
    #[arg(long, value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// Directory for work unit files (default: system temp dir)
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// Characters a decoding may contain: strict or prose
    #[arg(long, default_value = "strict", value_parser = parse_charset)]
    charset: Charset,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_charset(s: &str) -> Result<Charset, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if secs <= 0.0 {
        return Err(format!("timeout must be a positive number of seconds, got {}", s));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{}", e))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .finish();
    // Only fails if a subscriber is already installed
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("xorsweep {}", get_version());
        return ExitCode::SUCCESS;
    }

    let Some(file) = cli.file else {
        eprintln!("Error: no input file given");
        return ExitCode::FAILURE;
    };

    init_logging(cli.verbose);

    let options = SweepOptions {
        workers: cli.workers,
        worker_timeout: cli.timeout,
        temp_dir: cli.temp_dir,
        charset: cli.charset,
    };

    let result = sweep_file(&file, &options).and_then(|report| {
        if cli.json {
            println!("{}", report.to_json()?);
        } else {
            print!("{}", report);
        }
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
