use snip_core::repository::{Repository, UrlRecord};
use snip_core::{ShortCode, StorageError, StoreError, UniqueColumn};
use snip_generator::Generator;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Default number of insert attempts before giving up on a fresh code.
pub const DEFAULT_MAX_ATTEMPTS: usize = 8;

#[derive(Debug, Clone, TypedBuilder)]
pub struct CodeStoreSettings {
    /// Total insert attempts for one shorten call, including the first.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
}

impl Default for CodeStoreSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Allocates short codes and persists mappings.
///
/// The store never keeps state of its own: every call goes to the
/// repository, and the repository's uniqueness constraints decide races.
#[derive(Debug)]
pub struct CodeStore<R, G> {
    repository: R,
    generator: G,
    settings: CodeStoreSettings,
}

impl<R: Repository, G: Generator> CodeStore<R, G> {
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_settings(repository, generator, CodeStoreSettings::default())
    }

    pub fn with_settings(repository: R, generator: G, settings: CodeStoreSettings) -> Self {
        Self {
            repository,
            generator,
            settings,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Returns the code for `original_url`, creating a mapping if none exists.
    ///
    /// A generated code that is already taken is replaced by a fresh one
    /// until `max_attempts` inserts have failed, after which
    /// [`StoreError::GenerationExhausted`] is returned. If another caller
    /// stores the same URL concurrently, that caller's code is returned.
    pub async fn shorten(&self, original_url: &str) -> Result<ShortCode> {
        if let Some(existing) = self.repository.find_by_original(original_url).await? {
            trace!(code = %existing.short_code, "reusing existing short code");
            return Ok(existing.short_code);
        }

        for attempt in 1..=self.settings.max_attempts {
            let candidate: ShortCode = self.generator.generate().into();
            let record = UrlRecord {
                original_url: original_url.to_owned(),
                short_code: candidate.clone(),
            };

            match self.repository.insert(record).await {
                Ok(()) => {
                    debug!(code = %candidate, attempt, "stored new mapping");
                    return Ok(candidate);
                }
                Err(StorageError::Conflict {
                    column: UniqueColumn::Short,
                    ..
                }) => {
                    warn!(code = %candidate, attempt, "short code collision, retrying");
                }
                Err(StorageError::Conflict {
                    column: UniqueColumn::Original,
                    ..
                }) => return self.concurrent_winner(original_url).await,
                Err(err) => return Err(err.into()),
            }
        }

        Err(StoreError::GenerationExhausted {
            attempts: self.settings.max_attempts,
        })
    }

    /// Resolves `code` to its original URL. The code is looked up as given.
    pub async fn resolve(&self, code: &str) -> Result<String> {
        match self.repository.find_by_short(code).await? {
            Some(record) => {
                trace!(code, "resolved short code");
                Ok(record.original_url)
            }
            None => {
                trace!(code, "short code not found");
                Err(StoreError::NotFound(code.to_owned()))
            }
        }
    }

    async fn concurrent_winner(&self, original_url: &str) -> Result<ShortCode> {
        match self.repository.find_by_original(original_url).await? {
            Some(existing) => {
                debug!(code = %existing.short_code, "url stored concurrently, reusing its code");
                Ok(existing.short_code)
            }
            None => Err(StorageError::InvalidData(format!(
                "insert rejected a duplicate url that cannot be read back: {original_url}"
            ))
            .into()),
        }
    }
}
