//! Exporters turning a diagram into file contents.
//!
//! Every exporter produces the complete output in memory. Files are only
//! touched by [`write_atomically`], which either replaces the destination
//! with the full contents or leaves it alone.

pub mod dot;
#[cfg(feature = "graphviz")]
pub mod graphviz;
pub mod png;
pub mod svg;

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{debug, error, info};
use tempfile::NamedTempFile;
use thiserror::Error;

use astrolabe_core::diagram::Diagram;

/// A single trait implemented by every output backend.
pub trait Exporter {
    /// Serializes `diagram` into the bytes of one output file.
    fn export(&self, diagram: &Diagram) -> Result<Vec<u8>, Error>;
}

/// Failures while producing or writing an output file.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Render(String),

    #[error("failed to write `{}`: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("layout failed: {0}")]
    Layout(String),

    #[error("rasterization failed: {0}")]
    Rasterize(String),

    #[error("graphviz failed: {0}")]
    Graphviz(String),
}

/// Writes `bytes` to `path` through a temporary file in the same directory.
///
/// The temporary file is renamed over `path` only after every byte was
/// written, so readers never observe a partial file.
///
/// # Errors
///
/// Returns [`Error::Write`] if the parent directory does not exist or is not
/// writable, or if `path` names a directory.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let write_error = |source: io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !directory.is_dir() {
        error!(path:? = path; "Output directory does not exist");
        return Err(write_error(io::Error::new(
            io::ErrorKind::NotFound,
            format!("directory `{}` does not exist", directory.display()),
        )));
    }

    debug!(directory:? = directory; "Creating temporary output file");
    let mut file = NamedTempFile::new_in(directory).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    file.flush().map_err(write_error)?;
    file.persist(path).map_err(|err| write_error(err.error))?;

    info!(path:? = path, bytes = bytes.len(); "Output written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_write_atomically_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");

        write_atomically(&path, b"<svg/>").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"<svg/>");

        // Replaces existing contents.
        write_atomically(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_missing_directory_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");

        let err = write_atomically(&path, b"data").unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
        assert!(!path.exists());
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_directory_target_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("taken");
        fs::create_dir(&target).unwrap();

        assert!(write_atomically(&target, b"data").is_err());
        // The temporary file is cleaned up.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
