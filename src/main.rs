use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use folio::cli::commands::Cli;
use folio::cli::handlers;

/// Log to stderr. `RUST_LOG` picks the level unless `-v` forces debug.
fn init_logging(verbose: bool) -> Option<LoggerHandle> {
    let logger = if verbose {
        Logger::try_with_str("debug")
    } else {
        Logger::try_with_env_or_str("warn")
    };
    match logger.and_then(|l| l.log_to_stderr().start()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let _logger = init_logging(cli.verbose);

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
