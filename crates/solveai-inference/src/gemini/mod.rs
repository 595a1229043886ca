//! Google Gemini inference backend.
//!
//! Talks to the `generateContent` REST endpoint with one user turn made of an
//! optional inline image/PDF part followed by the instruction text.
//!
//! # Example
//!
//! ```rust,no_run
//! use solveai_inference::gemini::{GeminiBackend, GeminiConfig};
//! use solveai_core::{GenerationBackend, GenerationRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = GeminiConfig::from_env();
//!     let backend = GeminiBackend::new(config).unwrap();
//!
//!     if backend.is_configured() {
//!         let text = backend
//!             .generate(&GenerationRequest::text("Olá"))
//!             .await
//!             .unwrap();
//!         println!("{}", text);
//!     }
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{GeminiBackend, GeminiConfig};
pub use error::{to_solveai_error, GeminiErrorCode};
pub use types::*;
