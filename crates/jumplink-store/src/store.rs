use crate::error::Result;
use async_trait::async_trait;
use jumplink_core::{LinkRecord, Page};

/// The short-link store contract.
///
/// Every operation accepts short codes as raw strings and lowercases them
/// before use. Absence is never an error: lookups return `None`, deletes
/// return `false` and hits on unknown codes are ignored.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Registers `long_url`, either under `requested_code` or under a freshly
    /// generated code. An empty requested code counts as absent.
    async fn add(&self, long_url: &str, requested_code: Option<&str>) -> Result<LinkRecord>;

    /// Looks up the link for `code`.
    async fn find_by_code(&self, code: &str) -> Result<Option<LinkRecord>>;

    /// Returns every link in the backend's creation order.
    async fn list_all(&self) -> Result<Vec<LinkRecord>>;

    /// Returns one page of links; page 1 holds the newest ones.
    async fn list_page(&self, page: Page) -> Result<Vec<LinkRecord>>;

    /// Counts one visit of `code`.
    async fn record_hit(&self, code: &str) -> Result<()>;

    /// Looks up `code` and counts a visit when it exists.
    ///
    /// The returned record carries the hit count from before this visit.
    async fn resolve(&self, code: &str) -> Result<Option<LinkRecord>>;

    /// Removes the link for `code`. Returns `true` if it existed.
    async fn delete(&self, code: &str) -> Result<bool>;
}
