use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::ARCHIVE_DIR;
use crate::error::Result;

/// Move every consumed input file into the archive subdirectory beneath the
/// input dir, marking them as processed. A name collision with a previously
/// archived file is not de-conflicted; the rename result is propagated as-is.
pub fn archive_inputs(input_dir: &Path, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let archive_dir = input_dir.join(ARCHIVE_DIR);
    fs::create_dir_all(&archive_dir)?;

    let mut moved = Vec::with_capacity(files.len());
    for file in files {
        let Some(file_name) = file.file_name() else {
            continue;
        };
        let dest = archive_dir.join(file_name);
        fs::rename(file, &dest)?;
        debug!("archived {} -> {}", file.display(), dest.display());
        moved.push(dest);
    }

    info!("📦 Archived {} input files", moved.len());
    Ok(moved)
}
