use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// GeoJSON file to scale
    #[arg(short, long, value_name = "FILE")]
    pub input_file: PathBuf,
    /// Folder to write the scaled artifact into
    #[arg(short, long, value_name = "FOLDER")]
    pub output_folder: PathBuf,
    /// Scale factor to apply (surveying surface-to-grid correction)
    #[arg(short, long, value_name = "FACTOR")]
    pub scale_factor: f64,
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    pub log_level: LevelFilter,
}
