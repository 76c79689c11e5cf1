use std::path::{Path, PathBuf};

use horadric_core::{BatchError, ImageTask};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Screenshots directly inside `dir`, sorted by path and indexed in that order.
pub fn scan_folder(dir: &Path) -> Result<Vec<ImageTask>, BatchError> {
    let input_error = |source| BatchError::Input {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(input_error)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_image(p))
        .collect();
    paths.sort();

    Ok(paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| ImageTask::new(index, path))
        .collect())
}
