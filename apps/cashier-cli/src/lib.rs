//! # Token Cashier Shell
//!
//! Reads one JSON command per line from stdin and writes one JSON response
//! per line to stdout. Logs go to stderr so stdout stays machine-readable.
//!
//! ## Module Organization
//! ```text
//! cashier_cli/
//! ├── lib.rs          ◄─── You are here (startup & line loop)
//! ├── state/
//! │   ├── mod.rs      ◄─── CashierState (engine + config)
//! │   └── config.rs   ◄─── CashierConfig (TOML + env)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command decoding & dispatch
//! │   ├── user.rs     ◄─── Users and balances
//! │   ├── product.rs  ◄─── Product catalog
//! │   ├── activity.rs ◄─── Promotions
//! │   └── purchase.rs ◄─── Purchases and revenue
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Example Session
//! ```text
//! $ cashier
//! > {"command":"register_user","name":"alice","tier":"vip1"}
//! < {"ok":true,"data":{"userId":1}}
//! > {"command":"buy_token","userId":1,"quantity":1000}
//! < {"ok":true,"data":{"charge":950,"balance":{"tokens":1000,"points":0}}}
//! > {"command":"buy_product","userId":1,"productId":7}
//! < {"ok":false,"error":{"code":"NOT_FOUND","message":"Product not found: 7"}}
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use state::{CashierConfig, CashierState};

/// Command-line flags.
#[derive(Debug, Parser)]
#[command(name = "cashier")]
#[command(version, about = "Token Cashier: JSON-lines loyalty ledger shell")]
pub struct Cli {
    /// Path to cashier.toml (defaults to the platform config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Counters reported when the input stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub handled: u64,
    pub failed: u64,
}

/// Runs the shell until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Shell Startup                                     │
/// │                                                                         │
/// │  1. Parse flags (--config)                                              │
/// │  2. Load config: defaults → cashier.toml → CASHIER_* env → validate    │
/// │  3. Initialize logging (RUST_LOG, else [app] log_filter) on stderr     │
/// │  4. Build stores + engine from the pricing section                     │
/// │  5. Serve stdin lines until EOF                                        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match CashierConfig::load(cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&state::AppSettings::default().log_filter);
            error!("Failed to load configuration: {}", e);
            return ExitCode::from(2);
        }
    };

    init_tracing(&config.app.log_filter);
    info!("Starting Token Cashier");

    let state = match CashierState::new(config) {
        Ok(state) => state,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::from(2);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    match serve(&state, stdin.lock(), stdout.lock()) {
        Ok(stats) => {
            info!(
                handled = stats.handled,
                failed = stats.failed,
                total_amount = state.cashier.total_amount(),
                "Input closed, shutting down"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("I/O failure: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Answers every command line in `input` on `output`.
///
/// Blank lines and lines starting with `#` are skipped. Command failures are
/// written as error responses; only I/O failures end the session early.
pub fn serve<R, W>(state: &CashierState, input: R, mut output: W) -> io::Result<SessionStats>
where
    R: BufRead,
    W: Write,
{
    let mut stats = SessionStats::default();

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if state.config.app.echo_commands {
            info!(command = %line, "Received command");
        }

        let response = commands::handle_line(state, line);
        stats.handled += 1;
        if !response.is_ok() {
            stats.failed += 1;
        }

        serde_json::to_writer(&mut output, &response)?;
        writeln!(output)?;
        output.flush()?;
    }

    debug!(handled = stats.handled, failed = stats.failed, "Session finished");
    Ok(stats)
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cashier_core=trace` - Trace the engine only
/// - Default: the configured `log_filter`
fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(script: &str) -> (SessionStats, Vec<serde_json::Value>) {
        let state = CashierState::default();
        let mut out = Vec::new();
        let stats = serve(&state, Cursor::new(script), &mut out).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (stats, lines)
    }

    #[test]
    fn test_one_response_per_command() {
        let (stats, responses) = run_script(
            "{\"command\":\"register_user\",\"name\":\"a\",\"tier\":0}\n\
             \n\
             # comment\n\
             {\"command\":\"get_user\",\"userId\":1}\n",
        );

        assert_eq!(stats, SessionStats { handled: 2, failed: 0 });
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["data"]["userId"], 1);
        assert_eq!(responses[1]["data"]["name"], "a");
    }

    #[test]
    fn test_bad_lines_do_not_stop_the_session() {
        let (stats, responses) = run_script(
            "garbage\n\
             {\"command\":\"total_amount\"}\n",
        );

        assert_eq!(stats, SessionStats { handled: 2, failed: 1 });
        assert_eq!(responses[0]["error"]["code"], "BAD_REQUEST");
        assert_eq!(responses[1]["data"]["totalAmount"], 0);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["cashier", "--config", "/tmp/cashier.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/cashier.toml")));

        let cli = Cli::parse_from(["cashier"]);
        assert!(cli.config.is_none());
    }
}
