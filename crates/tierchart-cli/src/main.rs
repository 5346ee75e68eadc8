//! Tierchart CLI - Lay out organization charts

mod cli;

use clap::Parser;

fn main() {
    // Logging is set up by the app once the flags are known
    let cli_args = cli::Cli::parse();

    let mut app = cli::TierchartApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
