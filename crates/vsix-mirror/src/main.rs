//! VSIX mirror CLI
//!
//! Downloads the latest Visual Studio Code extensions compatible with a given
//! engine version, expanding extension packs into their members.

use clap::Parser;
use std::path::PathBuf;
use vsix_mirror::commands::{mirror_extensions, MirrorOptions};
use vsix_mirror::resolver::DEFAULT_PLATFORMS;

#[derive(Parser)]
#[command(name = "vsix-mirror")]
#[command(about = "Mirror Visual Studio Code extensions for offline use", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose and debug info (dumps gallery queries and responses)
    #[arg(short, long)]
    verbose: bool,

    /// Output dir
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Engine version ("latest", "current", or a literal like 1.85.0)
    #[arg(short, long, default_value = "current")]
    engine: String,

    /// Config file listing extension identifiers under [vscode...] sections
    #[arg(short = 'f', long)]
    conf: Option<PathBuf>,

    /// Target platform (repeatable)
    #[arg(short, long = "platform")]
    platforms: Vec<String>,

    /// Extension identifiers (publisher.name)
    extensions: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let platforms = if cli.platforms.is_empty() {
        DEFAULT_PLATFORMS.iter().map(|p| p.to_string()).collect()
    } else {
        cli.platforms
    };

    mirror_extensions(MirrorOptions {
        output: cli.output,
        engine: cli.engine,
        conf: cli.conf,
        platforms,
        extensions: cli.extensions,
        verbose: cli.verbose,
    })?;

    Ok(())
}
