//! Disposable on-disk fixtures for backend tests.
//!
//! Every fixture owns a fresh temporary directory that is removed when the
//! fixture is dropped, so tests can run in parallel without sharing files.

pub mod error;

pub use error::{Result, TestInfraError};

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct LinkFileConfig {
    #[builder(default = "urls.csv".to_string())]
    file_name: String,
    /// Lines written to the file before the test starts.
    #[builder(default)]
    seed_lines: Vec<String>,
}

/// A flat link file inside a temporary directory.
pub struct TempLinkFile {
    dir: TempDir,
    path: PathBuf,
}

impl TempLinkFile {
    /// Creates the directory and, when seed lines are configured, the file.
    pub fn new(config: LinkFileConfig) -> Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join(&config.file_name);

        if !config.seed_lines.is_empty() {
            let mut contents = config.seed_lines.join("\n");
            contents.push('\n');
            fs::write(&path, contents)?;
        }

        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Reads the raw file contents; a missing file reads as empty.
    pub fn contents(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Returns the non-empty lines of the file.
    pub fn lines(&self) -> Result<Vec<String>> {
        Ok(self
            .contents()?
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct DatabaseConfig {
    #[builder(default = "urls.sqlite".to_string())]
    file_name: String,
}

/// A SQLite database path inside a temporary directory.
///
/// The database file itself is created by whoever opens it first.
pub struct TempDatabase {
    dir: TempDir,
    path: PathBuf,
}

impl TempDatabase {
    pub fn new(config: DatabaseConfig) -> Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join(&config.file_name);
        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Returns a `sqlite://` URL for the database file.
    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_file_is_seeded() {
        let file = TempLinkFile::new(
            LinkFileConfig::builder()
                .seed_lines(vec!["abc,https://example.com".to_string()])
                .build(),
        )
        .unwrap();

        assert_eq!(file.contents().unwrap(), "abc,https://example.com\n");
        assert_eq!(file.lines().unwrap(), vec!["abc,https://example.com"]);
    }

    #[test]
    fn unseeded_link_file_does_not_exist_yet() {
        let file = TempLinkFile::new(LinkFileConfig::builder().build()).unwrap();
        assert!(!file.path().exists());
        assert_eq!(file.contents().unwrap(), "");
    }

    #[test]
    fn database_url_points_into_temp_dir() {
        let db = TempDatabase::new(DatabaseConfig::builder().build()).unwrap();
        assert!(db.path().starts_with(db.dir()));
        assert!(db.database_url().starts_with("sqlite://"));
        assert!(db.database_url().ends_with("urls.sqlite"));
    }

    #[test]
    fn directory_is_removed_on_drop() {
        let file = TempLinkFile::new(LinkFileConfig::builder().build()).unwrap();
        let dir = file.dir().to_path_buf();
        drop(file);
        assert!(!dir.exists());
    }
}
