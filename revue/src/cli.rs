//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Terminal code review: load a source file, preview it, and review it.
#[derive(Debug, Parser)]
#[command(name = "revue", version, about)]
pub struct Cli {
    /// File to load on startup.
    pub file: Option<PathBuf>,

    /// Config file to use instead of the XDG default.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Largest file accepted, in bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_size: Option<u64>,

    /// Latency of the mock analyzer, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub analysis_delay_ms: Option<u64>,

    /// Color theme (`dark` or `catppuccin-mocha`).
    #[arg(long, value_name = "NAME")]
    pub theme: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positional_file_and_flags() {
        let cli = Cli::parse_from(["revue", "src/main.rs", "--analysis-delay-ms", "0"]);
        assert_eq!(cli.file.as_deref(), Some(std::path::Path::new("src/main.rs")));
        assert_eq!(cli.analysis_delay_ms, Some(0));
        assert!(cli.config.is_none());
    }
}
