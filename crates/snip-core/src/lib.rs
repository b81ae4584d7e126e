//! Core types and traits for the snip URL shortener.
//!
//! This crate provides the types shared by the storage backends, the
//! code store and the HTTP gateway.

pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use error::{
    CoreError, ErrorKind, Operation, ShortenerError, StorageError, StoreError, UniqueColumn,
};
pub use repository::{ReadRepository, Repository, UrlRecord};
pub use shortcode::{ShortCode, ALPHABET, CODE_LENGTH};
pub use shortener::Shortener;
