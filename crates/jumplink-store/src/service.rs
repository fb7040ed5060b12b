use crate::error::{Result, StoreError};
use crate::store::LinkStore;
use async_trait::async_trait;
use jumplink_core::{LinkRecord, Page, Repository, ShortCode, StorageError};
use jumplink_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// Tunables for [`LinkStoreService`].
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct StoreSettings {
    /// Upper bound on generated candidates per `add`. `None` keeps trying
    /// until a free code turns up.
    #[builder(default, setter(strip_option))]
    pub max_attempts: Option<usize>,
}

/// A concrete implementation of the [`LinkStore`] trait.
///
/// This service wraps a [`Repository`] and a [`Generator`] to handle:
/// - short code normalization and validation
/// - generating codes, retrying on every collision
/// - long URL validation
///
/// Uniqueness is checked before inserting, and the backend enforces it again
/// on insert, so a concurrent writer that wins the race surfaces as a
/// conflict (for requested codes) or another retry (for generated ones).
#[derive(Debug)]
pub struct LinkStoreService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    settings: StoreSettings,
}

impl<R, G> Clone for LinkStoreService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            settings: self.settings.clone(),
        }
    }
}

impl<R: Repository, G: Generator> LinkStoreService<R, G> {
    /// Creates a new `LinkStoreService` with default settings.
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_settings(repository, generator, StoreSettings::default())
    }

    pub fn with_settings(repository: R, generator: G, settings: StoreSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            settings,
        }
    }

    fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(StoreError::InvalidUrl("URL cannot be empty".to_string()));
        }

        if url.contains(['\n', '\r']) {
            return Err(StoreError::InvalidUrl(
                "URL cannot contain line breaks".to_string(),
            ));
        }

        Ok(())
    }

    async fn add_with_code(&self, long_url: &str, requested: &str) -> Result<LinkRecord> {
        let code = ShortCode::new(requested)?;

        if self.repository.exists(&code).await? {
            return Err(StoreError::Conflict(code.to_string()));
        }

        let record = LinkRecord::new(code, long_url);
        self.repository.insert(&record).await?;

        debug!(code = %record.short_code, "added link with requested code");
        Ok(record)
    }

    async fn add_generated(&self, long_url: &str) -> Result<LinkRecord> {
        let max_attempts = self.settings.max_attempts.map(|max| max.max(1));
        let mut attempts = 0;

        loop {
            if max_attempts.is_some_and(|max| attempts >= max) {
                warn!(attempts, "gave up looking for a free short code");
                return Err(StorageError::Exhausted { attempts }.into());
            }
            attempts += 1;

            let candidate: ShortCode = self.generator.generate_attempt(attempts).into();
            let code = match ShortCode::new(candidate.as_str()) {
                Ok(code) => code,
                Err(err) => {
                    warn!(candidate = %candidate, error = %err, "generator produced an invalid code");
                    continue;
                }
            };

            if self.repository.exists(&code).await? {
                debug!(code = %code, attempts, "generated code already taken, retrying");
                continue;
            }

            let record = LinkRecord::new(code, long_url);
            match self.repository.insert(&record).await {
                Ok(()) => {
                    debug!(code = %record.short_code, attempts, "added link with generated code");
                    return Ok(record);
                }
                Err(StorageError::Conflict(_)) => {
                    debug!(code = %record.short_code, attempts, "lost insert race, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// Normalizes a raw code; codes that can never be stored map to `None`.
fn lookup_code(raw: &str) -> Option<ShortCode> {
    ShortCode::new(raw).ok()
}

#[async_trait]
impl<R: Repository, G: Generator> LinkStore for LinkStoreService<R, G> {
    async fn add(&self, long_url: &str, requested_code: Option<&str>) -> Result<LinkRecord> {
        Self::validate_url(long_url)?;

        match requested_code.filter(|code| !code.is_empty()) {
            Some(requested) => self.add_with_code(long_url, requested).await,
            None => self.add_generated(long_url).await,
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<LinkRecord>> {
        let Some(code) = lookup_code(code) else {
            trace!(code, "lookup with invalid short code");
            return Ok(None);
        };

        Ok(self.repository.get(&code).await?)
    }

    async fn list_all(&self) -> Result<Vec<LinkRecord>> {
        Ok(self.repository.list().await?)
    }

    async fn list_page(&self, page: Page) -> Result<Vec<LinkRecord>> {
        Ok(self.repository.list_page(page).await?)
    }

    async fn record_hit(&self, code: &str) -> Result<()> {
        let Some(code) = lookup_code(code) else {
            return Ok(());
        };

        Ok(self.repository.record_hit(&code).await?)
    }

    async fn resolve(&self, code: &str) -> Result<Option<LinkRecord>> {
        let Some(code) = lookup_code(code) else {
            return Ok(None);
        };

        match self.repository.get(&code).await? {
            Some(record) => {
                self.repository.record_hit(&code).await?;
                debug!(code = %code, url = %record.long_url, "resolved short code");
                Ok(Some(record))
            }
            None => {
                trace!(code = %code, "short code not found");
                Ok(None)
            }
        }
    }

    async fn delete(&self, code: &str) -> Result<bool> {
        let Some(code) = lookup_code(code) else {
            return Ok(false);
        };

        let deleted = self.repository.delete(&code).await?;
        debug!(code = %code, deleted, "delete requested");
        Ok(deleted)
    }
}
