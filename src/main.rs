use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

use rktkeeper::configuration::config::Config;
use rktkeeper::runtime_management::runtime::RktRuntime;

#[derive(Parser)]
#[command(name = "rktkeeper")]
#[command(version)]
#[command(about = "Supervises single rkt containers and their network configuration")]
struct Args {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Report whether the rkt executable is available.
    Probe { config_file: PathBuf },
    /// Reconcile the runtime's network definition with the configured state.
    ConfigureNet { config_file: PathBuf },
    /// Start one container and print its identity.
    Run {
        config_file: PathBuf,
        /// Image override for this launch.
        #[arg(long)]
        image: Option<String>,
    },
    /// Stop a container started earlier, addressed by its instance uuid.
    Stop {
        config_file: PathBuf,
        /// Instance uuid printed by `run`.
        #[arg(long)]
        instance: Uuid,
    },
    /// Print the status report of a container started earlier.
    Status {
        config_file: PathBuf,
        /// Instance uuid printed by `run`.
        #[arg(long)]
        instance: Uuid,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Cmd::Probe { config_file } => {
            let config = Config::from_file(&config_file)?;
            if !RktRuntime::available(&config.environment) {
                return Err("rkt executable not found".into());
            }
            println!("rkt available");
            Ok(())
        }
        Cmd::ConfigureNet { config_file } => {
            let config = Config::from_file(&config_file)?;
            RktRuntime::configure_runtime(&config.environment, &config.network)?;
            info!("network {} configured", config.network.name);
            Ok(())
        }
        Cmd::Run { config_file, image } => {
            let config = Config::from_file(&config_file)?;
            let mut runtime =
                RktRuntime::new(config.environment, config.container, config.retry);
            runtime.start(image.as_deref())?;
            println!("instance: {}", runtime.uuid());
            if let Some(name) = runtime.runtime_name() {
                println!("runtime name: {}", name);
            }
            if let Some(pid) = runtime.pid() {
                println!("pid: {}", pid);
            }
            Ok(())
        }
        Cmd::Stop {
            config_file,
            instance,
        } => {
            let config = Config::from_file(&config_file)?;
            let mut runtime = RktRuntime::with_uuid(
                config.environment,
                config.container,
                config.retry,
                instance,
            );
            runtime.reattach()?;
            runtime.stop()?;
            info!("instance {} stopped", instance);
            Ok(())
        }
        Cmd::Status {
            config_file,
            instance,
        } => {
            let config = Config::from_file(&config_file)?;
            let mut runtime = RktRuntime::with_uuid(
                config.environment,
                config.container,
                config.retry,
                instance,
            );
            runtime.reattach()?;
            let report = runtime.status()?;
            println!("state: {}", report.state);
            if let Some(pid) = report.pid {
                println!("pid: {}", pid);
            }
            Ok(())
        }
    }
}
