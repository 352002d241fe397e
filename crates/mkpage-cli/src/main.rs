//! mkpage CLI - wrap a markdown document in a complete HTML page.
//!
//! Options come from `mkpage.toml` (auto-discovered or given with
//! `--config`), overridden by command line flags.

mod error;
mod output;
mod page;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use error::CliError;
use output::Output;
use page::PageArgs;

/// mkpage - wrap markdown in an HTML page.
#[derive(Parser)]
#[command(name = "mkpage", version, about)]
struct Cli {
    #[command(flatten)]
    page: PageArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.page.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::from)
        .and_then(|rt| rt.block_on(cli.page.execute()));

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
