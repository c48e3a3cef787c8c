//! Terminal dashboard for the reports channel with reconnection support.
//!
//! Connects with a session token, prints report and metrics pushes, and sends
//! `recent`, `annual` and `metrics` requests typed at the prompt.
//! Reconnects on connection loss (max 5 attempts with 5 second interval) and
//! exits when the server rejects the credential.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin reportcast-client -- --token <JWT>
//! REPORTCAST_TOKEN=<JWT> cargo run --bin reportcast-client -- -u ws://127.0.0.1:3000/ws/reports
//! ```

use clap::Parser;

use reportcast_shared::{logger::setup_logger, time::offset_from_hours};

#[derive(Parser, Debug)]
#[command(name = "reportcast-client")]
#[command(about = "Terminal dashboard for the Reportcast reports channel", long_about = None)]
struct Args {
    /// Session token (JWT)
    #[arg(short = 't', long, env = "REPORTCAST_TOKEN")]
    token: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3000/ws/reports")]
    url: String,

    /// Offset used to display timestamps, in whole hours east of UTC
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    utc_offset_hours: i32,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let Some(offset) = offset_from_hours(args.utc_offset_hours) else {
        tracing::error!("UTC offset out of range: {}h", args.utc_offset_hours);
        std::process::exit(1);
    };

    if let Err(e) = reportcast_client::run_client(args.url, args.token, offset).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
