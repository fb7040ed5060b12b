use async_trait::async_trait;
use jumplink_core::error::{Result, StorageError};
use jumplink_core::repository::{paginate, Page, ReadRepository, Repository};
use jumplink_core::{LinkRecord, ShortCode};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

/// Flat-file implementation of the repository contract.
///
/// Links live in a plain text file, one `short_code,long_url` record per
/// line. There is no in-memory index: every read parses the whole file.
/// Lines are split at the first comma, so long URLs may contain commas but
/// never line breaks. Hits are not tracked and always read back as zero.
///
/// Mutations are serialized by a writer lock shared between clones, so the
/// uniqueness check and the append happen atomically within one process.
/// Deletes rewrite the file into a sibling `.tmp` file and rename it over
/// the original.
#[derive(Debug, Clone)]
pub struct FlatFileRepository {
    path: PathBuf,
    writer: Arc<Mutex<()>>,
}

impl FlatFileRepository {
    /// Opens the link file at `path`, creating an empty one if it is missing.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| io_error(&path, e))?;

        info!(path = %path.display(), "opened flat-file link store");

        Ok(Self {
            path,
            writer: Arc::new(Mutex::new(())),
        })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("links"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_contents(&self) -> Result<String> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(io_error(&self.path, err)),
        }
    }

    async fn read_records(&self) -> Result<Vec<LinkRecord>> {
        let contents = self.read_contents().await?;
        Ok(parse_records(&self.path, &contents))
    }

    async fn append_line(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| io_error(&self.path, e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| io_error(&self.path, e))?;
        file.sync_data().await.map_err(|e| io_error(&self.path, e))?;

        Ok(())
    }

    async fn replace_contents(&self, contents: &str) -> Result<()> {
        let temp_path = self.temp_path();

        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(contents.as_bytes()).await?;
            file.sync_all().await?;
            fs::rename(&temp_path, &self.path).await
        }
        .await;

        if let Err(err) = written {
            // The original file is untouched until the rename succeeds.
            let _ = fs::remove_file(&temp_path).await;
            return Err(io_error(&self.path, err));
        }

        Ok(())
    }
}

fn io_error(path: &Path, err: std::io::Error) -> StorageError {
    StorageError::Io(format!("{}: {err}", path.display()))
}

fn format_line(record: &LinkRecord) -> String {
    format!("{},{}\n", record.short_code, record.long_url)
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    line.split_once(',')
}

fn parse_records(path: &Path, contents: &str) -> Vec<LinkRecord> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match parse_line(line) {
            Some((code, url)) => Some(LinkRecord::new(
                ShortCode::new_unchecked(code.to_ascii_lowercase()),
                url,
            )),
            None => {
                warn!(
                    path = %path.display(),
                    line = index + 1,
                    "skipping malformed link line"
                );
                None
            }
        })
        .collect()
}

fn line_matches(line: &str, code: &ShortCode) -> bool {
    parse_line(line).is_some_and(|(stored, _)| stored.eq_ignore_ascii_case(code.as_str()))
}

#[async_trait]
impl ReadRepository for FlatFileRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        Ok(self
            .read_records()
            .await?
            .into_iter()
            .find(|record| record.short_code == *code))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.get(code).await?.is_some())
    }

    async fn list(&self) -> Result<Vec<LinkRecord>> {
        self.read_records().await
    }

    async fn list_page(&self, page: Page) -> Result<Vec<LinkRecord>> {
        Ok(paginate(self.read_records().await?, page))
    }
}

#[async_trait]
impl Repository for FlatFileRepository {
    async fn insert(&self, record: &LinkRecord) -> Result<()> {
        if record.long_url.contains(['\n', '\r']) {
            return Err(StorageError::InvalidData(format!(
                "long url for '{}' contains a line break",
                record.short_code
            )));
        }

        let _guard = self.writer.lock().await;

        let contents = self.read_contents().await?;
        let existing = parse_records(&self.path, &contents)
            .into_iter()
            .find(|stored| stored.short_code == record.short_code);

        if let Some(existing) = existing {
            if existing.long_url == record.long_url {
                debug!(code = %record.short_code, "identical link line already present");
                return Ok(());
            }
            return Err(StorageError::Conflict(record.short_code.to_string()));
        }

        let mut line = format_line(record);
        if !contents.is_empty() && !contents.ends_with('\n') {
            line.insert(0, '\n');
        }
        self.append_line(&line).await?;

        debug!(code = %record.short_code, "appended link line");
        Ok(())
    }

    async fn record_hit(&self, code: &ShortCode) -> Result<()> {
        trace!(code = %code, "flat-file store does not track hits");
        Ok(())
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        let _guard = self.writer.lock().await;

        let contents = self.read_contents().await?;
        let mut kept = String::with_capacity(contents.len());
        let mut removed = false;

        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if line_matches(line, code) {
                removed = true;
                continue;
            }
            kept.push_str(line);
            kept.push('\n');
        }

        if !removed {
            return Ok(false);
        }

        self.replace_contents(&kept).await?;

        debug!(code = %code, "removed link line");
        Ok(true)
    }
}
