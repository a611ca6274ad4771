use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use pixelwire_core::client::tcp_client::TcpClient;
use pixelwire_core::filtering::domain::filter::FILTER_NAMES;
use pixelwire_core::filtering::infrastructure::filter_engine::FilterEngine;
use pixelwire_core::parallel::domain::band_executor::BandExecutor;
use pixelwire_core::parallel::infrastructure::inline_executor::InlineExecutor;
use pixelwire_core::parallel::infrastructure::worker_pool::WorkerPool;
use pixelwire_core::protocol::domain::request::Request;
use pixelwire_core::protocol::domain::response::{Response, ResponseLayout};
use pixelwire_core::server::domain::server_config::ServerConfig;
use pixelwire_core::server::filter_image_use_case::FilterImageUseCase;
use pixelwire_core::server::infrastructure::tcp_server::TcpServer;
use pixelwire_core::shared::constants::{available_parallelism, DEFAULT_LISTEN_ADDR};

/// Parallel image filters served over TCP.
#[derive(Parser)]
#[command(name = "pixelwire")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the filter server.
    Serve(ServeArgs),
    /// Send an image to a running server and save the result.
    Send(SendArgs),
    /// Filter an image locally without a server.
    Apply(ApplyArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
    addr: String,

    /// Bands per request when the client sends workers <= 0 (0 = one per CPU).
    #[arg(long, default_value = "0")]
    workers: usize,

    /// Band worker threads shared by all connections (default: one per CPU).
    #[arg(long)]
    pool_size: Option<usize>,

    /// Band jobs allowed to wait for a worker (default: 4 per worker).
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Seconds allowed for one whole request/response exchange.
    #[arg(long, default_value = "120")]
    deadline_secs: u64,

    /// Include the filter time in OK responses.
    #[arg(long)]
    timed: bool,
}

/// Filter selection shared by `send` and `apply`.
#[derive(Args)]
struct FilterArgs {
    /// Input JPEG, PNG or GIF file.
    input: PathBuf,

    /// Output file, written in the input's format.
    output: PathBuf,

    /// Filter name.
    #[arg(long, default_value = "grayscale")]
    filter: String,

    /// Blur radius, block size, brush size or quantile level count.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    radius: i32,
}

#[derive(Args)]
struct SendArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Server address.
    #[arg(long, default_value = "127.0.0.1:5000")]
    addr: String,

    /// Requested band count (0 = let the server decide).
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    workers: i32,

    /// Expect the timed response layout (server must run with --timed).
    #[arg(long)]
    timed: bool,

    /// Seconds to wait for the server.
    #[arg(long, default_value = "120")]
    timeout_secs: u64,
}

#[derive(Args)]
struct ApplyArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Band count (0 = one per CPU).
    #[arg(long, default_value = "0")]
    workers: usize,

    /// Run every band on the calling thread.
    #[arg(long)]
    inline: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    match cli.command {
        Command::Serve(args) => run_serve(args),
        Command::Send(args) => run_send(args),
        Command::Apply(args) => run_apply(args),
    }
}

fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::default()
        .with_addr(args.addr)
        .with_default_workers(args.workers)
        .with_deadline(Duration::from_secs(args.deadline_secs))
        .with_layout(layout(args.timed));
    if let Some(size) = args.pool_size {
        config = config.with_pool_size(size);
    }
    if let Some(capacity) = args.queue_capacity {
        config = config.with_queue_capacity(capacity);
    }

    TcpServer::bind(&config)?.serve()?;
    Ok(())
}

fn run_send(args: SendArgs) -> Result<(), Box<dyn std::error::Error>> {
    let image = fs::read(&args.filter.input)?;
    let request = Request::new(args.filter.filter, args.filter.radius, args.workers, image);
    log::debug!(
        "Sending {} bytes to {} for {}",
        request.image.len(),
        args.addr,
        request.filter_name
    );
    let client = TcpClient::new(args.addr)
        .with_layout(layout(args.timed))
        .with_timeout(Duration::from_secs(args.timeout_secs));

    match client.send(&request)? {
        Response::Ok { elapsed_ns, image } => {
            fs::write(&args.filter.output, image)?;
            match elapsed_ns {
                Some(ns) => println!(
                    "Wrote {} (filter took {:?})",
                    args.filter.output.display(),
                    Duration::from_nanos(ns)
                ),
                None => println!("Wrote {}", args.filter.output.display()),
            }
            Ok(())
        }
        Response::Error { message } => Err(format!("Server rejected request: {message}").into()),
    }
}

fn run_apply(args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let executor: Arc<dyn BandExecutor> = if args.inline {
        Arc::new(InlineExecutor)
    } else {
        let size = if args.workers > 0 {
            args.workers
        } else {
            available_parallelism()
        };
        Arc::new(WorkerPool::new(size, size)?)
    };
    let use_case = FilterImageUseCase::new(FilterEngine::new(executor), args.workers);

    let image = fs::read(&args.filter.input)?;
    let filtered = use_case.execute(&args.filter.filter, args.filter.radius, 0, &image)?;
    fs::write(&args.filter.output, filtered.bytes)?;
    println!(
        "Wrote {} as {} (filter took {:?})",
        args.filter.output.display(),
        filtered.format,
        filtered.elapsed
    );
    Ok(())
}

fn layout(timed: bool) -> ResponseLayout {
    if timed {
        ResponseLayout::Timed
    } else {
        ResponseLayout::Plain
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Command::Serve(args) => {
            if args.deadline_secs == 0 {
                return Err("Deadline must be at least 1 second".into());
            }
            if args.pool_size == Some(0) {
                return Err("Pool size must be at least 1".into());
            }
            if args.queue_capacity == Some(0) {
                return Err("Queue capacity must be at least 1".into());
            }
        }
        Command::Send(args) => {
            validate_filter_args(&args.filter)?;
            if args.timeout_secs == 0 {
                return Err("Timeout must be at least 1 second".into());
            }
        }
        Command::Apply(args) => validate_filter_args(&args.filter)?,
    }
    Ok(())
}

fn validate_filter_args(args: &FilterArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.input.exists() {
        return Err(format!("Input file not found: {}", args.input.display()).into());
    }
    if !FILTER_NAMES.contains(&args.filter.as_str()) {
        return Err(format!(
            "Filter must be one of: {}, got '{}'",
            FILTER_NAMES.join(", "),
            args.filter
        )
        .into());
    }
    Ok(())
}
