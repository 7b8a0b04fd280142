// Sentinel rejection codes returned by the meals/diets services

use crate::error::ErrorCode;
use serde::Serialize;
use std::fmt;

/// Sentinel code constants used by the remote API
///
/// The services signal validation failures by returning one of these
/// negative integers (or zero) as the raw response body alongside a
/// non-2xx status. These constants are the single source of truth for
/// that vocabulary.
pub struct SentinelCodes {}

impl SentinelCodes {
    /// Request body was not JSON
    pub const NOT_JSON: i32 = 0;

    /// A required parameter was missing from the request body
    pub const PARAM_MISSING: i32 = -1;

    /// A resource with the same identity already exists
    pub const ALREADY_EXISTS: i32 = -2;

    /// Dish name not recognized by the nutrition source
    pub const NOT_RECOGNIZED: i32 = -3;

    /// Upstream nutrition gateway was unreachable
    pub const GATEWAY_UNAVAILABLE: i32 = -4;

    /// Requested resource does not exist
    pub const NOT_FOUND: i32 = -5;
}

/// Rejections the remote API can express
///
/// Modeled as a closed enumeration rather than magic numbers so that
/// verification scenarios and reports can match on intent. Responses
/// whose body is not a known sentinel fall into `Unexpected` with the
/// raw status and body preserved for the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiRejection {
    /// Request content type was not application/json
    NotJson,

    /// Required request parameter missing
    ParamMissing,

    /// Resource already exists (duplicate name or identical meal triple)
    AlreadyExists,

    /// Dish name not recognized by the nutrition source
    NotRecognized,

    /// Nutrition gateway unreachable
    GatewayUnavailable,

    /// Resource not found
    NotFound,

    /// Response did not carry a known sentinel body
    Unexpected { status: u16, body: String },
}

impl ApiRejection {
    /// Map a non-success response's status and raw body to a rejection.
    pub fn from_parts(status: u16, body: &str) -> Self {
        match body.trim().parse::<i32>() {
            Ok(SentinelCodes::NOT_JSON) => ApiRejection::NotJson,
            Ok(SentinelCodes::PARAM_MISSING) => ApiRejection::ParamMissing,
            Ok(SentinelCodes::ALREADY_EXISTS) => ApiRejection::AlreadyExists,
            Ok(SentinelCodes::NOT_RECOGNIZED) => ApiRejection::NotRecognized,
            Ok(SentinelCodes::GATEWAY_UNAVAILABLE) => ApiRejection::GatewayUnavailable,
            Ok(SentinelCodes::NOT_FOUND) => ApiRejection::NotFound,
            _ => ApiRejection::Unexpected {
                status,
                body: body.trim().to_string(),
            },
        }
    }
}

impl ErrorCode for ApiRejection {
    fn code(&self) -> i32 {
        match self {
            ApiRejection::NotJson => SentinelCodes::NOT_JSON,
            ApiRejection::ParamMissing => SentinelCodes::PARAM_MISSING,
            ApiRejection::AlreadyExists => SentinelCodes::ALREADY_EXISTS,
            ApiRejection::NotRecognized => SentinelCodes::NOT_RECOGNIZED,
            ApiRejection::GatewayUnavailable => SentinelCodes::GATEWAY_UNAVAILABLE,
            ApiRejection::NotFound => SentinelCodes::NOT_FOUND,
            // No sentinel applies; surface the HTTP status instead.
            ApiRejection::Unexpected { status, .. } => *status as i32,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiRejection::NotJson => "request body was not JSON".to_string(),
            ApiRejection::ParamMissing => "required parameter missing".to_string(),
            ApiRejection::AlreadyExists => "resource already exists".to_string(),
            ApiRejection::NotRecognized => {
                "dish name not recognized by the nutrition source".to_string()
            }
            ApiRejection::GatewayUnavailable => "nutrition gateway unreachable".to_string(),
            ApiRejection::NotFound => "resource not found".to_string(),
            ApiRejection::Unexpected { status, body } => {
                format!("unexpected response (status {}, body {:?})", status, body)
            }
        }
    }
}

impl fmt::Display for ApiRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiRejection (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for ApiRejection {}
