//! # Token Cashier Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Token Cashier                                    │
//! │                                                                         │
//! │  stdin  ── JSON command lines ──►  cashier_cli::serve                   │
//! │                                         │                               │
//! │                                         ▼                               │
//! │                                  Cashier engine + stores               │
//! │                                         │                               │
//! │  stdout ◄── JSON response lines ────────┘                               │
//! │  stderr ◄── tracing logs                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The actual setup lives in lib.rs so it can be driven from tests.

use std::process::ExitCode;

fn main() -> ExitCode {
    cashier_cli::run()
}
