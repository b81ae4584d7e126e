//! URL shortener service implementation.
//!
//! [`CodeStore`] allocates short codes and persists mappings through a
//! [`snip_core::Repository`]; [`ShortenerService`] exposes it as a
//! [`snip_core::Shortener`].

pub mod service;
pub mod store;

pub use service::ShortenerService;
pub use store::{CodeStore, CodeStoreSettings, DEFAULT_MAX_ATTEMPTS};
