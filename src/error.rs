//! Error codes shared by every fallible subsystem.
//!
//! Each error enum implements [`ErrorCode`] so callers (the CLI, traces) can
//! report a stable `E_*` identifier next to the human-readable message.

/// Stable machine-readable code for an error value.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}
