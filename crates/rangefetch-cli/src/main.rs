use rangefetch_core::logging;

mod cli;

fn main() {
    // Initialize logging as early as possible; a read-only state dir is not fatal.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI, fetch and verify.
    let result = cli::run_from_args();
    if let Err(err) = &result {
        tracing::error!("{:#}", err);
        eprintln!("rangefetch error: {:#}", err);
    }
    std::process::exit(cli::exit_code(&result));
}
