//! Common utilities and shared types for the help center backend.
//!
//! This crate provides foundational components used across all workspace crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`],
//!   with field-level details in [`FieldError`]
//! - **Correlation**: Per-request identifiers readable from anywhere in the request task
//! - **ID Generation**: UUID primary keys via [`IdGenerator`]
//! - **Partial updates**: Presence-tracked fields via [`Patch`]
//! - **Storage**: Media storage backends (local filesystem, placeholder)
//! - **Validation**: Slug, e-mail and non-blank validators
//!
//! # Example
//!
//! ```no_run
//! use helpcenter_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID {id} for {}", config.server.environment);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod correlation;
pub mod error;
pub mod id;
pub mod patch;
pub mod storage;
pub mod validation;

pub use config::Config;
pub use correlation::RequestIds;
pub use error::{AppError, AppResult, FieldError, db_err, field_errors};
pub use id::IdGenerator;
pub use patch::Patch;
pub use storage::{
    LocalStorage, PlaceholderStorage, SharedStorage, StorageBackend, UploadedFile,
    generate_storage_key,
};
