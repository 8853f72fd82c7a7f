use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(about, version, author)]
pub struct Cli {
    /// Minimum log level to print out
    #[clap(long, value_enum, default_value = "warn")]
    pub log_level: LevelFilter,

    /// How long to wait on each USB transfer, in milliseconds
    #[clap(long, default_value = "500")]
    pub timeout_ms: u64,

    /// Give up on a reply from the amplifier after this many packets
    #[clap(long, default_value = "296")]
    pub max_packets: usize,

    /// Print results as JSON
    #[clap(long)]
    pub json: bool,

    #[clap(subcommand)]
    pub command: SubCommands,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    /// List attached amplifiers
    Devices,

    /// Show the active preset, and the names of the stored ones
    Status,

    /// Load a preset from the amplifier's memory
    Load {
        /// Preset slot, starting at 0
        slot: u8,
    },

    /// Send the amp and effect settings of a FUSE preset file to the amplifier
    Apply {
        /// The FUSE preset file
        file: PathBuf,
    },

    /// Store the current settings in a preset slot
    Save {
        /// Preset slot, starting at 0
        slot: u8,

        /// Name for the preset (at most 32 bytes)
        name: String,
    },

    /// Store effects from a FUSE preset file as an effect preset
    SaveEffects {
        /// Which effects of the file make up the preset
        #[clap(long, value_enum)]
        fx: EffectBank,

        /// Effect preset slot, starting at 0
        slot: u8,

        /// Name for the effect preset (at most 24 bytes)
        name: String,

        /// The FUSE preset file
        file: PathBuf,
    },

    /// Write a preset from the amplifier's memory to a FUSE preset file
    Export {
        /// Preset slot, starting at 0
        slot: u8,

        /// Where to write the file
        file: PathBuf,
    },
}

/// The amplifier stores a single modulation, delay or reverb effect, or a delay and reverb pair.
#[derive(clap::ValueEnum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum EffectBank {
    Modulation,
    Delay,
    Reverb,
    DelayReverb,
}

#[repr(usize)]
#[derive(clap::ValueEnum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum LevelFilter {
    /// A level lower than all log levels.
    Off,
    /// Corresponds to the `Error` log level.
    Error,
    /// Corresponds to the `Warn` log level.
    Warn,
    /// Corresponds to the `Info` log level.
    Info,
    /// Corresponds to the `Debug` log level.
    Debug,
    /// Corresponds to the `Trace` log level.
    Trace,
}
