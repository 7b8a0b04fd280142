// Local harness failure types

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Harness error code constants
///
/// Error code range: 2001-2005. These are disjoint from the remote
/// API's sentinel vocabulary (0..-5) so report consumers can tell a
/// local fault from an API rejection at a glance.
pub struct HarnessErrorCodes {}

impl HarnessErrorCodes {
    /// Request could not be sent or the connection failed mid-flight
    pub const TRANSPORT: i32 = 2001;

    /// Response arrived but did not match the documented contract
    pub const MALFORMED_RESPONSE: i32 = 2002;

    /// Reading or writing a local file failed
    pub const IO: i32 = 2003;

    /// A verification scenario ran before its prerequisite produced an id
    pub const PRECONDITION: i32 = 2004;

    /// A fixture set failed validation before loading
    pub const INVALID_FIXTURE: i32 = 2005;
}

/// Log a harness error with structured context
///
/// Logged fields mirror the report output: numeric code plus the
/// human-readable message, tagged with the call site's context string.
pub fn log_harness_error(err: &HarnessError, context: &str) {
    error!(
        "Harness error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Failures local to the harness
///
/// These cover everything that can go wrong on this side of the wire:
/// transport faults, contract violations in otherwise-successful
/// responses, file I/O for the query script, and scenario sequencing.
///
/// Error code range: 2001-2005
#[derive(Debug, Clone, PartialEq)]
pub enum HarnessError {
    /// Request could not be sent or the connection failed mid-flight
    Transport { context: String, details: String },

    /// Response arrived but did not match the documented contract
    MalformedResponse { context: String, details: String },

    /// Reading or writing a local file failed
    Io { path: String, details: String },

    /// A verification scenario ran before its prerequisite produced an id
    Precondition { scenario: String, missing: String },

    /// A fixture set failed validation before loading
    InvalidFixture { details: String },
}

impl ErrorCode for HarnessError {
    fn code(&self) -> i32 {
        match self {
            HarnessError::Transport { .. } => HarnessErrorCodes::TRANSPORT,
            HarnessError::MalformedResponse { .. } => HarnessErrorCodes::MALFORMED_RESPONSE,
            HarnessError::Io { .. } => HarnessErrorCodes::IO,
            HarnessError::Precondition { .. } => HarnessErrorCodes::PRECONDITION,
            HarnessError::InvalidFixture { .. } => HarnessErrorCodes::INVALID_FIXTURE,
        }
    }

    fn message(&self) -> String {
        match self {
            HarnessError::Transport { context, details } => {
                format!("transport failure during {}: {}", context, details)
            }
            HarnessError::MalformedResponse { context, details } => {
                format!("malformed response during {}: {}", context, details)
            }
            HarnessError::Io { path, details } => {
                format!("file error on {}: {}", path, details)
            }
            HarnessError::Precondition { scenario, missing } => {
                format!("scenario {} missing prerequisite {}", scenario, missing)
            }
            HarnessError::InvalidFixture { details } => {
                format!("invalid fixture set: {}", details)
            }
        }
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HarnessError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for HarnessError {}

impl From<reqwest::Error> for HarnessError {
    fn from(err: reqwest::Error) -> Self {
        let context = err
            .url()
            .map(|url| url.to_string())
            .unwrap_or_else(|| "request".to_string());
        HarnessError::Transport {
            context,
            details: err.to_string(),
        }
    }
}
