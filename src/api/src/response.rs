//! Response envelope and its rendering into an HTTP reply

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{codes, Result};
use crate::error_codes::ErrorCodeTable;

/// Handler result wrapped in the service envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub error: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    pub data: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_evaluated_key: Option<Value>,

    /// Moved onto the HTTP reply, never serialized into the body
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// Serialize only `data` as the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bared_body: Option<bool>,
}

impl Response {
    pub fn data(data: Value) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_page(mut self, start: u64, count: u64, total: u64) -> Self {
        self.start = Some(start);
        self.count = Some(count);
        self.total = Some(total);
        self
    }

    pub fn bared(mut self) -> Self {
        self.is_bared_body = Some(true);
        self
    }
}

/// Transport-neutral HTTP reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

fn default_headers() -> BTreeMap<String, String> {
    [
        ("Content-Type", "application/json"),
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", "*"),
        ("Access-Control-Allow-Headers", "*"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Render a dispatch result
///
/// Success yields 200, or 301 when the handler set a `Location` header.
/// Failure takes its status and message from `table`.
pub fn render(result: Result<Response>, table: &ErrorCodeTable) -> HttpReply {
    let (mut response, failure) = match result {
        Ok(response) => (response, None),
        Err(err) => (Response::default(), Some(err)),
    };

    let mut headers = default_headers();
    let mut redirect = false;
    for (name, value) in std::mem::take(&mut response.headers) {
        if name.eq_ignore_ascii_case("location") {
            redirect = true;
        }
        headers.insert(name, value);
    }

    let status = match &failure {
        Some(err) => {
            response.error = err.code().to_string();
            response.message = table.describe(err);
            table.status_for(err.code())
        }
        None => {
            response.error = codes::SUCCESS.to_string();
            response.message = "Success".to_string();
            if redirect {
                301
            } else {
                200
            }
        }
    };

    let body = if response.is_bared_body == Some(true) {
        serde_json::to_string(&response.data)
    } else {
        serde_json::to_string(&response)
    }
    .unwrap_or_default();

    HttpReply {
        status,
        headers,
        body,
    }
}
