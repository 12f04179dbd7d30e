use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "glide", about = "Terminal Python playground", version)]
pub struct Cli {
    /// Python source file to open in the editor.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Python interpreter used to run code (overrides GLIDE_PYTHON).
    #[arg(long)]
    pub python: Option<String>,

    /// Directory downloaded files are written to (overrides GLIDE_DOWNLOAD_DIR).
    #[arg(long = "download-dir")]
    pub download_dir: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
