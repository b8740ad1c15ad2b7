use clap::Parser;
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use msh_lib::{decode_with_options, encode, DecodeOptions};

/// Test read/write for all MSH files recursively in a game dump.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// The root folder of the game dump
    root_folder: String,

    /// Ignore bytes after the last section instead of reporting an error
    #[arg(long)]
    allow_trailing_data: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let folder = Path::new(&cli.root_folder);
    let options = DecodeOptions {
        allow_trailing_data: cli.allow_trailing_data,
    };
    let start = std::time::Instant::now();

    let checked = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    globwalk::GlobWalkerBuilder::from_patterns(folder, &["*.{msh,MSH}"])
        .build()?
        .filter_map(|p| p.ok())
        .par_bridge()
        .for_each(|path| {
            checked.fetch_add(1, Ordering::Relaxed);
            if !check_read_write_msh(path.path(), &options) {
                failed.fetch_add(1, Ordering::Relaxed);
            }
        });

    log::info!(
        "Checked {} files with {} failures in {:?}",
        checked.into_inner(),
        failed.into_inner(),
        start.elapsed()
    );
    Ok(())
}

fn check_read_write_msh(path: &Path, options: &DecodeOptions) -> bool {
    let before = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Error opening {path:?}: {e}");
            return false;
        }
    };

    match decode_with_options(&before, options) {
        Ok(document) => {
            // Check any supported file for 1:1 read/write.
            match encode(&document) {
                Ok(after) => {
                    // Tolerated trailing data isn't written back.
                    if before[..before.len().min(after.len())] != after[..] {
                        log::warn!("Read/write not 1:1 for {path:?}");
                        return false;
                    }
                    log::debug!("Read/write 1:1 for {path:?} version {}", document.format_version);
                    true
                }
                Err(e) => {
                    log::error!("Error writing {path:?}: {e}");
                    false
                }
            }
        }
        Err(e) => {
            log::error!("Error reading {path:?}: {e}");
            false
        }
    }
}
