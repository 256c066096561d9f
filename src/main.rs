use clap::Parser;
use credfill::cli::commands::{cmd_analyze, cmd_generate};
use credfill::cli::config::{Cli, Commands};
use credfill::config::DetectionConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = DetectionConfig::load(cli.config.as_deref());

    match cli.command {
        Commands::Analyze { snapshot, format } => {
            cmd_analyze(&snapshot, &format, &config, cli.verbose)?;
        }
        Commands::Generate { count } => {
            cmd_generate(count)?;
        }
    }

    Ok(())
}
