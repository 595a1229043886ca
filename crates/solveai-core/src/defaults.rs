//! Centralized default constants for SolveAI.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own.

// =============================================================================
// MODEL
// =============================================================================

/// Environment variable holding the Gemini credential.
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Environment variable overriding the Gemini endpoint.
pub const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";

/// Environment variable overriding the Gemini model.
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";

/// Environment variable overriding the transport timeout (seconds).
pub const ENV_GEMINI_TIMEOUT: &str = "GEMINI_TIMEOUT";

/// Default Gemini REST endpoint.
pub const GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

/// Default generation model.
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Transport timeout for one model call, in seconds.
pub const GEMINI_TIMEOUT_SECS: u64 = 300;

/// Sampling temperature for solves (near-deterministic).
pub const SOLVE_TEMPERATURE: f32 = 0.1;

// =============================================================================
// SOLVE CONTRACT
// =============================================================================

/// MIME type assumed by `/api/extract-text` when the caller omits one.
pub const EXTRACT_MIME_TYPE: &str = "image/jpeg";

/// Separator placed between context materials in the prompt.
pub const MATERIAL_SEPARATOR: &str = "\n\n---\n\n";

/// Label suffix used when a folder file cannot be transcribed.
pub const CONTEXT_FILE_PLACEHOLDER: &str = "Arquivo de contexto";

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host.
pub const HOST: &str = "0.0.0.0";

/// Default bind port.
pub const PORT: u16 = 5000;

/// Default SQLite location for the local catalog.
pub const DATABASE_URL: &str = "sqlite://solveai.db?mode=rwc";

/// Request body limit; base64 images are large.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Origins allowed by CORS when `ALLOWED_ORIGINS` is unset.
pub const ALLOWED_ORIGINS: &str = "http://localhost:5000,http://localhost:5173";
