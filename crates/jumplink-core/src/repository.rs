use crate::error::Result;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A stored link: one short code mapped to one long URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The lookup key, always lowercase.
    pub short_code: ShortCode,
    /// The redirect target.
    pub long_url: String,
    /// Number of successful resolutions. Backends that do not track hits
    /// always report zero.
    pub hits: u64,
}

impl LinkRecord {
    /// Creates a fresh record with a zero hit count.
    pub fn new(short_code: ShortCode, long_url: impl Into<String>) -> Self {
        Self {
            short_code,
            long_url: long_url.into(),
            hits: 0,
        }
    }
}

/// A window over creation order, counted from the most recent link.
///
/// Page 1 holds the `size` newest links, page 2 the `size` before those.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u32,
    size: u32,
}

impl Page {
    pub const DEFAULT_SIZE: u32 = 10;

    /// Creates a page; zero values are raised to one.
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of newest links to skip before this page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_SIZE)
    }
}

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Checks whether a short code already exists in the repository.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Returns every stored record in the backend's creation order.
    async fn list(&self) -> Result<Vec<LinkRecord>>;

    /// Returns one page of records, oldest first within the page.
    async fn list_page(&self, page: Page) -> Result<Vec<LinkRecord>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new record. Returns `Err(Conflict)` if the code already exists.
    async fn insert(&self, record: &LinkRecord) -> Result<()>;

    /// Increments the hit counter for a given short code.
    /// Missing codes are ignored.
    async fn record_hit(&self, code: &ShortCode) -> Result<()>;

    /// Deletes the record for a given short code.
    /// Returns `true` if the record existed and was removed.
    async fn delete(&self, code: &ShortCode) -> Result<bool>;
}

/// Selects the records of `page` from a list already in creation order.
///
/// Shared by backends that materialize the full list anyway.
pub fn paginate(records: Vec<LinkRecord>, page: Page) -> Vec<LinkRecord> {
    let total = records.len();
    let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let end = total.saturating_sub(skip);
    let start = end.saturating_sub(page.size() as usize);

    records
        .into_iter()
        .skip(start)
        .take(end - start)
        .collect()
}
