pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRepository;
pub use snip_core::repository::{ReadRepository, Repository, Result, UrlRecord};
pub use snip_core::{StorageError, UniqueColumn};
pub use sqlite::SqliteRepository;
