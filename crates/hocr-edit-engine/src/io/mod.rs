use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::editing::{Document, LoadError, LoadOptions};

/// Extensions recognised as hOCR files when scanning a directory.
pub const HOCR_EXTENSIONS: &[&str] = &["hocr", "html", "xhtml"];

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load {path}: {source}")]
    Load { path: PathBuf, source: LoadError },
    #[error("Invalid directory: {0}")]
    InvalidDir(String),
}

/// Read and load an hOCR file with default options.
pub fn read_document(path: &Path) -> Result<Document, IoError> {
    read_document_with(path, &LoadOptions::default())
}

pub fn read_document_with(path: &Path, options: &LoadOptions) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    Document::load_with(&bytes, options).map_err(|source| IoError::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the file at `path` with `bytes`.
///
/// The bytes go to a temporary file in the same directory which is then
/// renamed over `path`, so readers see either the old or the new content.
/// An existing file keeps its permissions.
pub fn write_document(path: &Path, bytes: &[u8]) -> Result<(), IoError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }
    temp.persist(path).map_err(|e| IoError::Io(e.error))?;
    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Copy `path` to `<path><suffix>`, returning the backup path.
pub fn backup_file(path: &Path, suffix: &str) -> Result<PathBuf, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let mut backup = path.as_os_str().to_owned();
    backup.push(suffix);
    let backup = PathBuf::from(backup);

    fs::copy(path, &backup)?;
    Ok(backup)
}

/// Find hOCR files under `dir`, recursively, in sorted order.
pub fn scan_hocr_files(dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !dir.is_dir() {
        return Err(IoError::InvalidDir(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    scan_directory_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension().and_then(|e| e.to_str())
            && HOCR_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        {
            files.push(path);
        }
    }

    Ok(())
}
