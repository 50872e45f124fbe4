use std::path::PathBuf;

use clap::Parser;

pub mod global;

pub use global::GlobalFlags;

/// Top-level CLI parser for the `nk` binary.
#[derive(Debug, Parser)]
#[command(name = "nk", version, about = "Notekeep - personal notes in the terminal")]
pub struct Cli {
    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file to use instead of .notekeep/config.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for startup.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
        }
    }
}
