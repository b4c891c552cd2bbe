//! Nivalis application
//!
//! Opens the window, builds the pipeline and exits. Any failure is printed
//! to stderr and the process exits with status 1.

use nivalis_engine::foundation::logging;
use nivalis_engine::prelude::*;

fn run() -> Result<(), AppError> {
    let config = ApplicationConfig::default();
    logging::init(&config.log_level);

    log::info!("Starting {}", config.window.title);
    let mut app = Instance::new(config)?;
    app.init()?;

    log::info!("Application finished successfully");
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        log::error!("Application error: {:?}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
