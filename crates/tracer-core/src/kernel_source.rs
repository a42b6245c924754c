//! Reading the external kernel source from disk.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, TracerError};

/// Read at most `max_size` bytes of kernel source from `path`.
///
/// Longer files are truncated. Invalid UTF-8 is replaced rather than rejected;
/// the compiler reports it with a proper build log.
pub fn load_kernel_source(path: &Path, max_size: usize) -> Result<String> {
    let load_err = |source| TracerError::KernelLoad {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(load_err)?;
    let mut bytes = Vec::new();
    file.take(max_size as u64)
        .read_to_end(&mut bytes)
        .map_err(load_err)?;

    if bytes.len() == max_size {
        warn!(path = %path.display(), max_size, "kernel source reached size cap, truncated");
    }
    debug!(path = %path.display(), len = bytes.len(), "loaded kernel source");

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_kernel_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.cl");
        let err = load_kernel_source(&path, 1024).unwrap_err();
        match err {
            TracerError::KernelLoad { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reads_whole_file_under_cap() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "__kernel void sine_wave() {{}}").unwrap();
        let src = load_kernel_source(file.path(), 1024).unwrap();
        assert_eq!(src, "__kernel void sine_wave() {}");
    }

    #[test]
    fn truncates_at_cap() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'x'; 64]).unwrap();
        let src = load_kernel_source(file.path(), 16).unwrap();
        assert_eq!(src.len(), 16);
    }
}
