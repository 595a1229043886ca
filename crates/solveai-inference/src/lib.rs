//! # solveai-inference
//!
//! Model access for SolveAI.
//!
//! This crate provides:
//! - Gemini `generateContent` backend
//! - Solve prompt rendering with the JSON output contract
//! - Solver client that normalizes model output into `SolveResponse`
//! - Image/PDF transcription through the same backend
//! - Heuristic detection of lettered sub-items
//!
//! # Feature Flags
//!
//! - `mock`: expose `MockGenerationBackend` to dependent crates' tests
//!
//! # Example
//!
//! ```rust,no_run
//! use solveai_inference::SolverClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let solver = SolverClient::from_env().unwrap();
//!     let response = solver
//!         .solve_question("Calcule a força para m=2kg, a=3m/s²", &[], None)
//!         .await
//!         .unwrap();
//!     println!("{}", response.final_answer);
//! }
//! ```

pub mod gemini;
pub mod items;
pub mod prompt;
pub mod solver;

// Mock generation backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use solveai_core::*;

pub use gemini::{GeminiBackend, GeminiConfig};
pub use items::detect_item_letters;
pub use prompt::build_prompt;
pub use solver::{normalize_response, parse_solve_response, SolverClient};
