//! Rotating JSON snapshots of the budget, written before an operation replaces it wholesale.

use crate::model::AppData;
use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix for the snapshot taken before an import replaces the budget.
pub const PRE_IMPORT: &str = "pre-import";

const EXTENSION: &str = "json";

/// Manages backup file creation and rotation.
///
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
}

impl Backup {
    pub fn new(config: &Config) -> Self {
        Self::with_dir(config.backups(), config.backup_copies())
    }

    pub(crate) fn with_dir(backups_dir: impl Into<PathBuf>, backup_copies: u32) -> Self {
        Self {
            backups_dir: backups_dir.into(),
            backup_copies,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Saves `data` as a pretty-printed JSON backup file named `{prefix}.YYYY-MM-DD-NNN.json`,
    /// where NNN counts up within a day. Older files with the same prefix are deleted so that at
    /// most `backup_copies` remain.
    ///
    /// Returns the path to the created backup file.
    pub async fn save_json(&self, prefix: &str, data: &AppData) -> Result<PathBuf> {
        let date = today();
        let seq = self.next_sequence_number(prefix, &date).await?;
        let path = self
            .backups_dir
            .join(format!("{prefix}.{date}-{seq:03}.{EXTENSION}"));

        let json = serde_json::to_string_pretty(data).context("Failed to serialize the budget")?;
        utils::write(&path, json).await?;
        debug!("Wrote backup {}", path.display());

        self.rotate(prefix).await?;
        Ok(path)
    }

    /// Backup file names with `prefix`, oldest first.
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if is_backup_file(&name, prefix) {
                names.push(name);
            }
        }
        // The name format makes lexical order chronological.
        names.sort();
        Ok(names)
    }

    async fn next_sequence_number(&self, prefix: &str, date: &str) -> Result<u32> {
        let max_seq = self
            .list(prefix)
            .await?
            .iter()
            .filter_map(|name| parse_sequence_number(name, prefix, date))
            .max()
            .unwrap_or(0);
        Ok(max_seq + 1)
    }

    async fn rotate(&self, prefix: &str) -> Result<()> {
        let names = self.list(prefix).await?;
        let to_delete = names.len().saturating_sub(self.backup_copies as usize);
        for name in names.into_iter().take(to_delete) {
            debug!("Rotating out backup {name}");
            utils::remove(self.backups_dir.join(name)).await?;
        }
        Ok(())
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parses NNN out of `{prefix}.{date}-NNN.json`.
fn parse_sequence_number(filename: &str, prefix: &str, date: &str) -> Option<u32> {
    filename
        .strip_prefix(&format!("{prefix}.{date}-"))?
        .strip_suffix(&format!(".{EXTENSION}"))?
        .parse()
        .ok()
}

fn is_backup_file(filename: &str, prefix: &str) -> bool {
    filename.starts_with(&format!("{prefix}.")) && filename.ends_with(&format!(".{EXTENSION}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Month;
    use tempfile::TempDir;

    #[test]
    fn test_parse_sequence_number() {
        assert_eq!(
            parse_sequence_number("pre-import.2025-12-14-001.json", "pre-import", "2025-12-14"),
            Some(1)
        );
        assert_eq!(
            parse_sequence_number("pre-import.2025-12-14-042.json", "pre-import", "2025-12-14"),
            Some(42)
        );
        assert_eq!(
            parse_sequence_number("other.2025-12-14-001.json", "pre-import", "2025-12-14"),
            None
        );
        assert_eq!(
            parse_sequence_number("pre-import.2025-12-13-001.json", "pre-import", "2025-12-14"),
            None
        );
        assert_eq!(
            parse_sequence_number("pre-import.2025-12-14-001.csv", "pre-import", "2025-12-14"),
            None
        );
    }

    #[test]
    fn test_is_backup_file() {
        assert!(is_backup_file("pre-import.2025-12-14-001.json", "pre-import"));
        assert!(!is_backup_file("pre-import.2025-12-14-001.json", "other"));
        assert!(!is_backup_file("pre-import.2025-12-14-001", "pre-import"));
    }

    #[tokio::test]
    async fn test_save_json_rotates() {
        let dir = TempDir::new().unwrap();
        let backup = Backup::with_dir(dir.path(), 3);
        let data = AppData::initial(Month::new(2024, 11).unwrap());

        let mut paths = Vec::new();
        for _ in 0..5 {
            paths.push(backup.save_json(PRE_IMPORT, &data).await.unwrap());
        }

        let names = backup.list(PRE_IMPORT).await.unwrap();
        assert_eq!(names.len(), 3);
        assert!(names[2].ends_with("-005.json"));
        assert!(!paths[0].exists());
        assert!(paths[4].exists());

        let content = utils::read(&paths[4]).await.unwrap();
        let back: AppData = serde_json::from_str(&content).unwrap();
        assert_eq!(back, data);
    }
}
