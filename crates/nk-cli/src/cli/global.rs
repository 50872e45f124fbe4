use std::path::PathBuf;

/// Flags shared by startup and the interactive shell.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub quiet: bool,
    pub verbose: bool,
    pub config: Option<PathBuf>,
}
