//! Binary entry point
//!
//! Wires settings, logging, the terminal gateway, and the app shell
//! together. Logging goes to a file because stderr belongs to the
//! alternate screen while the game runs.

use std::fs::File;
use std::process::ExitCode;

use pantry_moth::app::App;
use pantry_moth::gateway::TermGateway;
use pantry_moth::{GameError, Settings};

fn init_logger(settings: &Settings) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Ok(file) = File::create(&settings.log_file) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

fn run(settings: Settings) -> Result<(), GameError> {
    let gateway = TermGateway::new()?;
    let mut app = App::new(gateway, settings)?;
    app.run()
}

fn main() -> ExitCode {
    let settings = Settings::load();
    init_logger(&settings);
    log::info!("pantry-moth {} starting", env!("CARGO_PKG_VERSION"));

    match run(settings) {
        Ok(()) => {
            log::info!("clean shutdown");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            // By now the gateway has been dropped and the terminal restored
            eprintln!("pantry-moth: {err}");
            ExitCode::FAILURE
        }
    }
}
