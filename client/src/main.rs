mod cli;
mod effects;
mod output;

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{debug, info};
use mustang_profile::Preset;
use mustang_usb::error::{CommandError, ConnectError};
use mustang_usb::{find_devices, AmpState, AmpTransport, Mustang, SessionConfig};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

use crate::cli::{Cli, LevelFilter, SubCommands};
use crate::effects::effect_batch;
use crate::output::{print_bank, print_devices, print_state};

fn main() -> Result<()> {
    let cli: Cli = Cli::parse();

    CombinedLogger::init(vec![TermLogger::new(
        match cli.log_level {
            LevelFilter::Off => log::LevelFilter::Off,
            LevelFilter::Error => log::LevelFilter::Error,
            LevelFilter::Warn => log::LevelFilter::Warn,
            LevelFilter::Info => log::LevelFilter::Info,
            LevelFilter::Debug => log::LevelFilter::Debug,
            LevelFilter::Trace => log::LevelFilter::Trace,
        },
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])
    .context("Could not configure the logger")?;

    if let SubCommands::Devices = cli.command {
        return print_devices(&find_devices(), cli.json);
    }

    let config = SessionConfig {
        timeout: Duration::from_millis(cli.timeout_ms),
        max_response_packets: cli.max_packets,
    };
    debug!("Session configuration: {:?}", config);

    let mut mustang = Mustang::new(config);
    let state = mustang.start().map_err(connect_error)?;

    // Stop regardless of how the command went, the error is reported afterwards.
    let result = run(&mut mustang, state, &cli);
    mustang.stop();
    result
}

fn run<T: AmpTransport>(mustang: &mut Mustang<T>, state: AmpState, cli: &Cli) -> Result<()> {
    match &cli.command {
        SubCommands::Devices => Ok(()),
        SubCommands::Status => print_state(&state, cli.json),
        SubCommands::Load { slot } => {
            let bank = mustang
                .load_memory_bank(*slot)
                .map_err(|e| command_error("Loading the preset", e))?;
            print_bank(&bank, cli.json)
        }
        SubCommands::Apply { file } => {
            let preset = load_preset(file)?;

            mustang
                .set_amplifier(&preset.amp)
                .map_err(|e| command_error("Setting the amplifier", e))?;
            for effect in &preset.effects {
                mustang
                    .set_effect(effect)
                    .map_err(|e| command_error("Setting an effect", e))?;
            }

            info!("Applied '{}'", preset.name);
            Ok(())
        }
        SubCommands::Save { slot, name } => {
            let bank = mustang
                .save_on_amp(name, *slot)
                .map_err(|e| command_error("Saving the preset", e))?;
            print_bank(&bank, cli.json)
        }
        SubCommands::SaveEffects {
            fx,
            slot,
            name,
            file,
        } => {
            let preset = load_preset(file)?;
            let effects = effect_batch(&preset.effects, *fx)
                .map_err(|category| anyhow!("{} has no {} effect", file.display(), category))?;

            mustang
                .save_effects(*slot, name, &effects)
                .map_err(|e| command_error("Saving the effects", e))?;

            info!("Saved {} effects as '{}'", effects.len(), name);
            Ok(())
        }
        SubCommands::Export { slot, file } => {
            let bank = mustang
                .load_memory_bank(*slot)
                .map_err(|e| command_error("Loading the preset", e))?;

            Preset::from(bank)
                .write(file)
                .with_context(|| format!("Unable to write {}", file.display()))?;

            info!("Exported slot {} to {}", slot, file.display());
            Ok(())
        }
    }
}

fn load_preset(file: &Path) -> Result<Preset> {
    Preset::load_file(file).with_context(|| format!("Unable to load {}", file.display()))
}

fn connect_error(error: ConnectError) -> anyhow::Error {
    if error.is_device_not_found() {
        return anyhow!("Suitable device not found!");
    }
    anyhow!(
        "Unable to connect to the amplifier (error {}): {}",
        error.code(),
        error
    )
}

fn command_error(action: &str, error: CommandError) -> anyhow::Error {
    anyhow!("{} failed (error {}): {}", action, error.code(), error)
}
