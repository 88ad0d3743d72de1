//! Font lookup and loading.

use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
use tracing::debug;

use crate::{Result, WatermarkError};

/// Find a font file by name.
///
/// The name is tried as given (relative to the working directory) first,
/// then joined onto each search directory in order.
pub fn resolve_font(name: impl AsRef<Path>, search_dirs: &[PathBuf]) -> Result<PathBuf> {
    let name = name.as_ref();
    if name.is_file() {
        return Ok(name.to_path_buf());
    }

    if name.is_relative() {
        for dir in search_dirs {
            let candidate = dir.join(name);
            debug!(candidate = %candidate.display(), "Trying font location");
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    Err(WatermarkError::FontNotFound {
        name: name.display().to_string(),
        searched: 1 + search_dirs.len(),
    })
}

/// Read and parse a TrueType/OpenType font file.
pub fn load_font(path: impl AsRef<Path>) -> Result<FontVec> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| WatermarkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FontVec::try_from_vec(data).map_err(|_| WatermarkError::InvalidFont {
        path: path.to_path_buf(),
    })
}
