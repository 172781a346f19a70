//! Error-code table: coarse code → message and HTTP status

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{codes, ApiError};

/// Status used for codes missing from the table
pub const DEFAULT_STATUS: u16 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCode {
    pub message: String,
    pub status_code: u16,
}

impl ErrorCode {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }
}

/// Immutable after construction
#[derive(Debug, Clone, Default)]
pub struct ErrorCodeTable {
    codes: HashMap<String, ErrorCode>,
}

impl ErrorCodeTable {
    /// Table holding only the dispatch core's codes
    pub fn with_defaults() -> Self {
        let mut entries = HashMap::new();
        entries.insert(codes::NOT_AUTHORIZED.to_string(), ErrorCode::new("Not authorized", 403));
        entries.insert(codes::ROUTE_NOT_FOUND.to_string(), ErrorCode::new("Route not found", 404));
        entries.insert(
            codes::AUTHORIZER_UNAVAILABLE.to_string(),
            ErrorCode::new("No authorizer for identity", 401),
        );
        entries.insert(
            codes::UPSTREAM_LOOKUP_FAILED.to_string(),
            ErrorCode::new("Identity store lookup failed", 502),
        );
        entries.insert(
            codes::HANDLER_MISCONFIGURED.to_string(),
            ErrorCode::new("Handler misconfigured", 500),
        );
        Self { codes: entries }
    }

    /// Defaults overlaid with service-specific codes
    pub fn with_service_codes(service_codes: HashMap<String, ErrorCode>) -> Self {
        let mut table = Self::with_defaults();
        table.codes.extend(service_codes);
        table
    }

    pub fn get(&self, code: &str) -> Option<&ErrorCode> {
        self.codes.get(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn status_for(&self, code: &str) -> u16 {
        self.get(code).map_or(DEFAULT_STATUS, |c| c.status_code)
    }

    /// `code:message:detail`, or `code:detail` for an unregistered code
    pub fn describe(&self, err: &ApiError) -> String {
        match self.get(err.code()) {
            Some(entry) => format!("{}:{}:{}", err.code(), entry.message, err),
            None => format!("{}:{}", err.code(), err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_statuses() {
        let table = ErrorCodeTable::with_defaults();
        assert_eq!(table.status_for(codes::NOT_AUTHORIZED), 403);
        assert_eq!(table.status_for(codes::ROUTE_NOT_FOUND), 404);
        assert_eq!(table.status_for(codes::UPSTREAM_LOOKUP_FAILED), 502);
        assert_eq!(table.status_for("nope"), DEFAULT_STATUS);
    }

    #[test]
    fn test_service_codes_override() {
        let mut extra = HashMap::new();
        extra.insert("E1".to_string(), ErrorCode::new("Out of stock", 409));
        extra.insert(codes::ROUTE_NOT_FOUND.to_string(), ErrorCode::new("Nothing here", 410));
        let table = ErrorCodeTable::with_service_codes(extra);

        assert_eq!(table.status_for("E1"), 409);
        assert_eq!(table.status_for(codes::ROUTE_NOT_FOUND), 410);
    }

    #[test]
    fn test_describe() {
        let table = ErrorCodeTable::with_defaults();
        let err = ApiError::AuthorizerUnavailable("unknown identity kind".to_string());
        assert_eq!(
            table.describe(&err),
            "401:No authorizer for identity:No authorizer available: unknown identity kind"
        );

        let err = ApiError::handler("E9", "boom");
        assert_eq!(table.describe(&err), "E9:boom");
    }
}
