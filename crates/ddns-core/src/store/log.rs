//! File-backed event log

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::traits::EventLog;

/// Event log appending to a plain text file
///
/// The file is opened in append/create mode for every line, so nothing is
/// held open between cycles and external rotation is safe.
#[derive(Debug, Clone)]
pub struct FileEventLog {
    path: PathBuf,
}

impl FileEventLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventLog for FileEventLog {
    fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lines_are_appended() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ddns.log");
        std::fs::write(&path, "existing\n").unwrap();

        let log = FileEventLog::new(&path);
        log.append("first").unwrap();
        log.append("second").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "existing\nfirst\nsecond\n");
    }
}
