// # Configuration File Store
//
// Loads and saves the flat configuration file.
//
// ## Atomic Writes
//
// `save` never truncates the live file in place:
// 1. Render the whole file to memory
// 2. Write it to `<path>.tmp` and flush
// 3. Rename the temporary file over `<path>`
//
// A failure at any step leaves the previous file untouched and surfaces as a
// single `Error::Io`.

use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::DdnsConfig;
use crate::error::{Error, Result};
use crate::store::format;

/// File-backed configuration store
///
/// # Example
///
/// ```rust,no_run
/// use ddns_core::store::ConfigStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = ConfigStore::new("config.txt");
///     let mut config = store.load().await?;
///
///     config.set_interval(600)?;
///     store.save(&config).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration file
    ///
    /// # Returns
    ///
    /// - `Ok(DdnsConfig)`: parsed interval and entries
    /// - `Err(Error::ConfigNotFound)`: the file does not exist
    /// - `Err(Error::Io)`: the file exists but could not be read
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
    /// failing the whole file.
    pub async fn load(&self) -> Result<DdnsConfig> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound(self.path.clone()));
            }
            Err(e) => return Err(Error::Io(e)),
        };

        // Invalid UTF-8 only affects the field it appears in
        let content = String::from_utf8_lossy(&bytes);
        if matches!(content, Cow::Owned(_)) {
            tracing::warn!(
                "{} is not valid UTF-8, invalid bytes replaced with U+FFFD",
                self.path.display()
            );
        }

        let config = format::parse(&content);
        tracing::debug!(
            "Loaded {} entr{} from {} (interval {}s)",
            config.entries.len(),
            if config.entries.len() == 1 { "y" } else { "ies" },
            self.path.display(),
            config.interval_secs
        );
        Ok(config)
    }

    /// Overwrite the configuration file atomically
    pub async fn save(&self, config: &DdnsConfig) -> Result<()> {
        let content = format::render(config);
        let temp_path = self.temp_path();

        if let Err(e) = self.write_temp(&temp_path, content.as_bytes()).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            tracing::error!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            );
            let _ = fs::remove_file(&temp_path).await;
            return Err(Error::Io(e));
        }

        tracing::info!(
            "Saved {} entr{} to {}",
            config.entries.len(),
            if config.entries.len() == 1 { "y" } else { "ies" },
            self.path.display()
        );
        Ok(())
    }

    async fn write_temp(&self, temp_path: &Path, bytes: &[u8]) -> Result<()> {
        let mut file = fs::File::create(temp_path).await.map_err(|e| {
            tracing::error!("Failed to create temp file {}: {}", temp_path.display(), e);
            Error::Io(e)
        })?;

        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Entry;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.txt"));

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(ref p) if p.ends_with("config.txt")));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced_not_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        std::fs::write(&path, b"interval,60\nnoip,bar.example.org,,alice,caf\xe9\n").unwrap();

        let config = ConfigStore::new(&path).load().await.unwrap();
        assert_eq!(config.interval_secs, 60);
        assert_eq!(config.entries.get(0).unwrap().pass(), "caf\u{FFFD}");
    }

    #[tokio::test]
    async fn test_save_overwrites_and_cleans_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        std::fs::write(&path, "# old\nduckdns,old.example.com,t\n").unwrap();

        let store = ConfigStore::new(&path);
        let mut config = DdnsConfig::new();
        config.set_interval(90).unwrap();
        config.entries.push(Entry::new("noip", "new.example.org")).unwrap();
        store.save(&config).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "interval,90\nnoip,new.example.org,,,\n");
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        std::fs::write(&path, "interval,60\n").unwrap();

        // A directory squatting on the temp path makes the write fail
        let store = ConfigStore::new(&path);
        std::fs::create_dir(store.temp_path()).unwrap();

        let result = store.save(&DdnsConfig::new()).await;
        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "interval,60\n");
    }
}
