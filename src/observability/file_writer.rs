//! Size-rotated log file writer.
//!
//! [`RotatingFileWriter`] appends to a log file and, once the file grows past
//! a size limit, shifts it into numbered backups (`tabstash.log.1` is the
//! newest) keeping a fixed number of them.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Maximum log file size before rotation (5 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Number of backup files retained after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Appending log writer with size-based rotation.
///
/// The file is opened lazily on the first write, so constructing a writer
/// never fails. Wrap it in a `Mutex` to hand it to `tracing-subscriber`.
pub struct RotatingFileWriter {
    file_path: PathBuf,
    file: Option<File>,
    max_bytes: u64,
    max_backups: usize,
}

impl RotatingFileWriter {
    /// Creates a writer with the default limits.
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    /// Creates a writer with explicit size and backup limits.
    #[must_use]
    pub fn with_limits(file_path: impl Into<PathBuf>, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path: file_path.into(),
            file: None,
            max_bytes,
            max_backups,
        }
    }

    /// Path of the active log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.file_path.as_os_str().to_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn check_and_rotate(&mut self) -> io::Result<()> {
        let Ok(metadata) = fs::metadata(&self.file_path) else {
            return Ok(());
        };
        if metadata.len() <= self.max_bytes {
            return Ok(());
        }

        self.file = None;
        self.rotate_files()
    }

    /// Shifts `log.N-1` → `log.N` down to `log` → `log.1`, dropping the oldest.
    fn rotate_files(&self) -> io::Result<()> {
        if self.max_backups == 0 {
            return fs::remove_file(&self.file_path);
        }

        let oldest = self.backup_path(self.max_backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.max_backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.file_path, self.backup_path(1))
    }

    fn file(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            self.file = Some(file);
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file unavailable"))
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.check_and_rotate()?;
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}
