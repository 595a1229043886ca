//! Structured logging field name constants for SolveAI.
//!
//! All crates use these names so log queries work across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Failed request or model call surfaced to the caller |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration (files in a folder, response fields) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the HTTP layer. Format: UUIDv7.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db", "inference"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "gemini", "solver", "pool", "assembler", "intake"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "solve", "extract_text", "create_folder", "assemble"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Folder UUID being operated on.
pub const FOLDER_ID: &str = "folder_id";

/// File UUID being operated on.
pub const FILE_ID: &str = "file_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

/// Number of context materials sent with a solve.
pub const MATERIAL_COUNT: &str = "material_count";
