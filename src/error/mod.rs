// Error types for the mealprobe harness
//
// This module defines the two error vocabularies the harness deals with:
// the remote API's sentinel rejection codes and the harness's own local
// failures (transport, malformed responses, file I/O).

mod api;
mod harness;

pub use api::{ApiRejection, SentinelCodes};
pub use harness::{log_harness_error, HarnessError, HarnessErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, keeping report output and log lines
/// consistent across the harness.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
