//! Request payload assembly
//!
//! Sources are merged into one JSON object in a fixed order; a later source
//! overwrites keys set by an earlier one:
//! stage variables, body, query string, cookies.
//!
//! Routes are literal paths, so there are no path parameters to merge.

use serde_json::{Map, Value};

/// Raw request parts a payload is built from
#[derive(Debug, Clone, Default)]
pub struct PayloadSources<'a> {
    pub stage_variables: &'a [(String, String)],
    pub body: &'a str,
    pub query: Option<&'a str>,
    pub cookie: Option<&'a str>,
}

pub fn build_payload(sources: &PayloadSources<'_>) -> Value {
    let mut payload = Map::new();

    for (key, value) in sources.stage_variables {
        payload.insert(key.clone(), Value::String(value.clone()));
    }

    if !sources.body.is_empty() {
        match serde_json::from_str::<Map<String, Value>>(sources.body) {
            Ok(fields) => payload.extend(fields),
            Err(_) => payload.extend(form_fields(sources.body)),
        }
    }

    if let Some(query) = sources.query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            payload.insert(key.into_owned(), Value::String(value.into_owned()));
        }
    }

    if let Some(cookie) = sources.cookie {
        for pair in cookie.split("; ") {
            let parts: Vec<&str> = pair.split('=').collect();
            if let [key, value] = parts.as_slice() {
                payload.insert(key.to_string(), Value::String(value.to_string()));
            }
        }
    }

    Value::Object(payload)
}

/// URL-encoded form: one value becomes a string, repeated keys an array
fn form_fields(body: &str) -> Map<String, Value> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value.into_owned()),
            None => grouped.push((key.into_owned(), vec![value.into_owned()])),
        }
    }

    grouped
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                Value::String(values.remove(0))
            } else {
                Value::Array(values.into_iter().map(Value::String).collect())
            };
            (key, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_body() {
        let payload = build_payload(&PayloadSources {
            body: r#"{"name": "report", "size": 3}"#,
            ..Default::default()
        });
        assert_eq!(payload, json!({"name": "report", "size": 3}));
    }

    #[test]
    fn test_form_body() {
        let payload = build_payload(&PayloadSources {
            body: "tag=a&tag=b&title=hello%20world",
            ..Default::default()
        });
        assert_eq!(payload, json!({"tag": ["a", "b"], "title": "hello world"}));
    }

    #[test]
    fn test_precedence() {
        let stage_variables = [
            ("id".to_string(), "stage".to_string()),
            ("table".to_string(), "items".to_string()),
        ];

        let payload = build_payload(&PayloadSources {
            stage_variables: &stage_variables,
            body: r#"{"id": "body"}"#,
            query: Some("id=query&page=2"),
            cookie: Some("session=abc; id=cookie; broken"),
        });

        assert_eq!(
            payload,
            json!({
                "id": "cookie",
                "table": "items",
                "page": "2",
                "session": "abc"
            })
        );
    }

    #[test]
    fn test_empty_sources() {
        assert_eq!(build_payload(&PayloadSources::default()), json!({}));
    }
}
