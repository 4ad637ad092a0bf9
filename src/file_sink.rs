use std::fs::{File, Metadata, OpenOptions};
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// Output handle used by the rotation manager.
///
/// The rotation logic only ever needs these four operations, so the choice
/// between a buffered stream and a raw descriptor stays behind this trait.
/// Implementations must be opened in append mode: every write lands at the
/// current end of the file even if another writer extended it.
pub trait FileSink: Send {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Pushes buffered bytes to the OS.
    fn flush(&mut self) -> io::Result<()>;

    /// Returns the current on-disk length of the open file.
    fn seek_to_end(&mut self) -> io::Result<u64>;

    /// Identity of the file behind the open handle.
    fn identity(&self) -> io::Result<FileIdentity>;
}

/// Platform identity of a file: device and inode on unix.
///
/// Two identities are equal when they name the same file object, regardless
/// of the path used to reach it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FileIdentity {
    dev: u64,
    ino: u64,
}

impl FileIdentity {
    #[cfg(unix)]
    pub fn of(meta: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            dev: meta.dev(),
            ino: meta.ino(),
        }
    }

    // Without stable file indexes, the creation time is the best available
    // approximation; deletion is still detected through a missing path.
    #[cfg(not(unix))]
    pub fn of(meta: &Metadata) -> Self {
        let created = meta
            .created()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self { dev: 0, ino: created }
    }
}

/// Identity of whatever file currently lives at `path`.
pub fn path_identity(path: &Path) -> io::Result<FileIdentity> {
    std::fs::metadata(path).map(|meta| FileIdentity::of(&meta))
}

/// Which `FileSink` implementation the rotation manager opens.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SinkKind {
    /// Buffered stream; bytes reach the OS on flush or when the buffer fills.
    #[default]
    Buffered,
    /// Raw descriptor; every write is a syscall.
    Direct,
}

impl SinkKind {
    /// Opens `path` for appending, creating it if needed. With `truncate`,
    /// existing content is discarded first.
    pub fn open(self, path: &Path, truncate: bool) -> io::Result<Box<dyn FileSink>> {
        let file = open_append(path, truncate)?;
        Ok(match self {
            SinkKind::Buffered => Box::new(BufferedSink {
                writer: BufWriter::with_capacity(BUFFER_CAPACITY, file),
            }),
            SinkKind::Direct => Box::new(DirectSink { file }),
        })
    }
}

const BUFFER_CAPACITY: usize = 64 * 1024;

fn open_append(path: &Path, truncate: bool) -> io::Result<File> {
    if truncate {
        // O_APPEND and O_TRUNC cannot be combined through OpenOptions.
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

pub struct BufferedSink {
    writer: BufWriter<File>,
}

impl FileSink for BufferedSink {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn seek_to_end(&mut self) -> io::Result<u64> {
        self.writer.flush()?;
        self.writer.get_mut().seek(SeekFrom::End(0))
    }

    fn identity(&self) -> io::Result<FileIdentity> {
        self.writer.get_ref().metadata().map(|meta| FileIdentity::of(&meta))
    }
}

pub struct DirectSink {
    file: File,
}

impl FileSink for DirectSink {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }

    fn seek_to_end(&mut self) -> io::Result<u64> {
        self.file.seek(SeekFrom::End(0))
    }

    fn identity(&self) -> io::Result<FileIdentity> {
        self.file.metadata().map(|meta| FileIdentity::of(&meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_append_and_length() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.log");
        std::fs::write(&path, b"existing\n").unwrap();

        for kind in [SinkKind::Buffered, SinkKind::Direct] {
            let mut sink = kind.open(&path, false).unwrap();
            let before = sink.seek_to_end().unwrap();
            sink.write_all(b"more\n").unwrap();
            sink.flush().unwrap();
            assert_eq!(sink.seek_to_end().unwrap(), before + 5);
        }
        assert_eq!(std::fs::read(&path).unwrap(), b"existing\nmore\nmore\n");
    }

    #[test]
    fn test_truncate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("b.log");
        std::fs::write(&path, b"old content\n").unwrap();
        let mut sink = SinkKind::Direct.open(&path, true).unwrap();
        assert_eq!(sink.seek_to_end().unwrap(), 0);
        sink.write_all(b"new\n").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_identity_tracks_replacement() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.log");
        let sink = SinkKind::Buffered.open(&path, false).unwrap();
        assert_eq!(sink.identity().unwrap(), path_identity(&path).unwrap());

        std::fs::rename(&path, dir.path().join("c.log.1")).unwrap();
        assert!(path_identity(&path).is_err());

        std::fs::write(&path, b"").unwrap();
        assert_ne!(sink.identity().unwrap(), path_identity(&path).unwrap());
    }
}
