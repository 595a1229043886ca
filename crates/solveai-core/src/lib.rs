//! # solveai-core
//!
//! Core types, traits, and abstractions for SolveAI.
//!
//! This crate provides the catalog records, the solve contract, the error
//! type, and the trait seams (repositories, generation backend, text
//! extractor) that the other SolveAI crates depend on.

pub mod content_type;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod payload;
pub mod traits;
pub mod uuid_utils;

// Re-export commonly used types at crate root
pub use content_type::{detect_content_type, is_extractable, sanitize_filename};
pub use error::{Error, Result};
pub use models::*;
pub use payload::{encode_data_url, parse_data_url, DataUrl};
pub use traits::*;
pub use uuid_utils::{extract_timestamp, is_v7, new_v7};
