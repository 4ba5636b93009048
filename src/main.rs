use clap::Parser;
use serial_attr::cli::{self, Cli};
use serial_attr::config::ConfigLoader;
use serial_attr::logging;
use serial_attr::port::NativeDriver;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from(path)?.into_config(),
        None => match ConfigLoader::load() {
            Ok(loader) => loader.into_config(),
            Err(e) => {
                eprintln!("Warning: Failed to load config, using defaults: {}", e);
                ConfigLoader::with_defaults().into_config()
            }
        },
    };

    logging::init(&config.logging, args.verbose);

    let driver = NativeDriver::new(config.port.baud);
    let stdout = std::io::stdout();
    cli::execute(&args.command, driver, &config, &mut stdout.lock())?;
    Ok(())
}
