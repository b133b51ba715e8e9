//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `notekeep_core` linkage without any web transport.
//! - With a database path argument, open (and migrate) that store and report
//!   its schema version.
//! - With a second log directory argument, route core `event=...` lines to
//!   rolling files there.
//!
//! Usage: `notekeep_cli [db_path [log_dir]]`

use notekeep_core::db::{migrations::latest_version, open_db};
use notekeep_core::{init_logging, LoggingConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("notekeep_core ping={}", notekeep_core::ping());
    println!("notekeep_core version={}", notekeep_core::core_version());

    let mut args = std::env::args().skip(1);
    let Some(db_path) = args.next() else {
        return ExitCode::SUCCESS;
    };

    if let Some(log_dir) = args.next() {
        if let Err(err) = init_logging(&LoggingConfig::new(&log_dir)) {
            eprintln!("notekeep_core log_dir={log_dir} error={err}");
            return ExitCode::FAILURE;
        }
    }

    match open_db(&db_path) {
        Ok(_conn) => {
            println!("notekeep_core db={db_path} schema_version={}", latest_version());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("notekeep_core db={db_path} error={err}");
            ExitCode::FAILURE
        }
    }
}
