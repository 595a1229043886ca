//! Service layer for business logic.

pub mod context_assembler;
pub mod intake;

pub use context_assembler::{AssembledContext, ContextAssembler};
pub use intake::{IntakeItem, IntakeSession};
