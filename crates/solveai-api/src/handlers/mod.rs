//! HTTP handler modules for solveai-api.

pub mod folders;
pub mod health;
pub mod solve;
