use std::{
    fs::{self, File},
    io::{self, Write},
    path::Path,
};

use crate::api::error::ProtoPersonError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Complete { written: usize },
    Short { written: usize, expected: usize },
}

impl WriteOutcome {
    pub fn written(&self) -> usize {
        match self {
            Self::Complete { written } | Self::Short { written, .. } => *written,
        }
    }
}

/// Creates (or truncates) `path` and writes `bytes` with a single write call.
///
/// The file handle is released before returning on every path. A failed write
/// unlinks the destination (regular files and symlinks only) so no partial
/// output is left behind.
pub fn persist(path: &Path, bytes: &[u8]) -> Result<WriteOutcome, ProtoPersonError> {
    let mut file = File::create(path).map_err(|source| ProtoPersonError::FileCreate {
        path: path.to_path_buf(),
        source,
    })?;

    match write_once(&mut file, bytes) {
        Ok(outcome) => Ok(outcome),
        Err(source) => {
            drop(file);
            discard_partial(path);
            Err(ProtoPersonError::FileWrite {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

// Only regular files and symlinks are unlinked; unlinking a symlink leaves its target alone.
fn discard_partial(path: &Path) {
    let removable = path.symlink_metadata().is_ok_and(|metadata| {
        let file_type = metadata.file_type();
        file_type.is_file() || file_type.is_symlink()
    });
    if !removable {
        log::warn!(
            "Partial output left in place, not a regular file. Path: {}",
            path.display()
        );
        return;
    }

    if let Err(err) = fs::remove_file(path) {
        log::warn!(
            "Could not remove partial output. Path: {}, Error: {err}",
            path.display()
        );
    }
}

/// One write, no retry. Fewer bytes than requested is logged and reported, not an error.
pub fn write_once<W>(writer: &mut W, bytes: &[u8]) -> io::Result<WriteOutcome>
where
    W: Write,
{
    let written = writer.write(bytes)?;
    if written < bytes.len() {
        log::warn!("wrote {written} bytes");
        return Ok(WriteOutcome::Short {
            written,
            expected: bytes.len(),
        });
    }

    log::trace!("Write completed. Bytes: {written}");
    Ok(WriteOutcome::Complete { written })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Capped {
        capacity: usize,
        received: Vec<u8>,
    }

    impl Write for Capped {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let taken = buf.len().min(self.capacity);
            self.received.extend_from_slice(&buf[..taken]);
            Ok(taken)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn short_write_is_reported_and_not_retried() {
        let mut writer = Capped {
            capacity: 3,
            received: vec![],
        };
        let outcome = write_once(&mut writer, b"abcdef").unwrap();
        assert_eq!(
            outcome,
            WriteOutcome::Short {
                written: 3,
                expected: 6
            }
        );
        assert_eq!(writer.received, b"abc");
    }

    #[test]
    fn full_write_is_complete() {
        let mut writer = Capped {
            capacity: 64,
            received: vec![],
        };
        let outcome = write_once(&mut writer, b"abcdef").unwrap();
        assert_eq!(outcome, WriteOutcome::Complete { written: 6 });
        assert_eq!(outcome.written(), 6);
    }

    #[test]
    fn write_errors_propagate() {
        let err = write_once(&mut Broken, b"abc").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::StorageFull);
    }

    #[test]
    fn persists_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("person.bin");
        fs::write(&path, b"previous, longer content").unwrap();

        let outcome = persist(&path, b"\x0a\x01A").unwrap();
        assert_eq!(outcome, WriteOutcome::Complete { written: 3 });
        assert_eq!(fs::read(&path).unwrap(), b"\x0a\x01A");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_write_removes_the_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("person.bin");
        std::os::unix::fs::symlink("/dev/full", &path).unwrap();

        let err = persist(&path, b"\x0a\x01A").unwrap_err();
        assert!(matches!(err, ProtoPersonError::FileWrite { .. }), "{err:?}");
        assert!(path.symlink_metadata().is_err());
        assert!(Path::new("/dev/full").exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_write_leaves_device_nodes_alone() {
        let path = Path::new("/dev/full");

        let err = persist(path, b"\x0a\x01A").unwrap_err();
        assert!(matches!(err, ProtoPersonError::FileWrite { .. }), "{err:?}");
        assert!(path.exists());
    }

    #[test]
    fn missing_directory_is_a_create_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("person.bin");

        let err = persist(&path, b"\x0a\x01A").unwrap_err();
        assert!(matches!(err, ProtoPersonError::FileCreate { .. }), "{err:?}");
        assert!(!path.exists());
    }
}
