//! CAN Capture Workbench Server
//!
//! HTTP front end for the isotp-decoder library. It exposes one processing
//! endpoint for the capture-upload frontend and serves the built frontend
//! bundle itself, so a single binary hosts the whole tool.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

mod error;
mod routes;

/// CAN Capture Workbench - decode CAN capture tables over HTTP
#[derive(Parser, Debug)]
#[command(name = "isotp-server")]
#[command(about = "Serve the CAN capture decoder and its web frontend", long_about = None)]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Directory holding the built frontend bundle
    #[arg(long, value_name = "DIR", default_value = "dist")]
    static_dir: PathBuf,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("CAN Capture Workbench Server v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", isotp_decoder::VERSION);

    if !args.static_dir.is_dir() {
        log::warn!(
            "Static directory {:?} not found; only the API will be served",
            args.static_dir
        );
    }

    let app = routes::create_router(&args.static_dir);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    log::info!("Listening on http://{}", addr);
    log::info!("  POST /api/process - decode an uploaded capture");
    log::info!("  GET  /*           - frontend from {:?}", args.static_dir);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
