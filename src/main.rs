//! Mirror Latency Bench - Main CLI Application
//!
//! Downloads every catalog file repeatedly from each mirror endpoint and
//! appends one timing row per trial to a CSV file.

use clap::Parser;
use mirror_latency_bench::{
    app::App,
    cli::Cli,
    error::{AppError, ErrorReporter},
};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    let cli = Cli::parse();
    let reporter = ErrorReporter::new(!cli.no_color, cli.verbose || cli.debug);

    if let Err(message) = cli.validate() {
        let error = AppError::validation(message);
        reporter.report_error(&error);
        process::exit(error.exit_code());
    }

    if let Err(e) = App::new(cli).run().await {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}
