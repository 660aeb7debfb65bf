//! `SQLite` URL handling for the progress database.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

pub const MEMORY_URL: &str = "sqlite::memory:";

/// `<data dir>/greeting/greeting.sqlite3`, or `None` when the platform has
/// no data directory.
#[must_use]
pub fn default_db_url() -> Option<String> {
    dirs::data_dir().map(|dir| {
        let path = dir.join("greeting").join("greeting.sqlite3");
        format!("sqlite://{}", path.display())
    })
}

/// Turn `path`, `sqlite:path` or `sqlite://path` into an absolute
/// `sqlite://` URL. Memory URLs pass through.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == MEMORY_URL || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directories so the pool can
/// open it.
///
/// # Errors
///
/// Fails on a URL without a path or when the filesystem refuses.
pub fn prepare_sqlite_file(db_url: &str) -> anyhow::Result<()> {
    if db_url == MEMORY_URL {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid database url: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid database url: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_and_full_urls_pass_through() {
        assert_eq!(normalize_sqlite_url(MEMORY_URL), MEMORY_URL);
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/a.sqlite3"),
            "sqlite:///tmp/a.sqlite3"
        );
    }

    #[test]
    fn relative_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/g.sqlite3");
        let path = url.strip_prefix("sqlite://").unwrap();
        assert!(Path::new(path).is_absolute());
        assert!(path.ends_with("g.sqlite3"));
    }

    #[test]
    fn prepare_creates_nested_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested").join("g.sqlite3");
        let url = format!("sqlite://{}?mode=rwc", file.display());

        prepare_sqlite_file(&url).unwrap();
        assert!(file.exists());
        // second call leaves the existing file alone
        prepare_sqlite_file(&url).unwrap();
    }

    #[test]
    fn prepare_rejects_url_without_path() {
        assert!(prepare_sqlite_file("sqlite://").is_err());
        assert!(prepare_sqlite_file("postgres://x").is_err());
        assert!(prepare_sqlite_file(MEMORY_URL).is_ok());
    }
}
