use log::debug;
use serde_json::Value;

use expression::Number;

use crate::error::ApiError;

/// Fetches JSON documents from third-party APIs
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(client: reqwest::Client) -> UpstreamClient {
        UpstreamClient { client }
    }

    pub async fn fetch_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Value, ApiError> {
        debug!("GET {} {:?}", url, query);
        let mut request = self.client.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        request
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await
            .map_err(ApiError::from)
    }
}

/// Selects the value at a JSON pointer, treating `null` as absent
pub fn extract<'a>(value: &'a Value, pointer: &str) -> Option<&'a Value> {
    value.pointer(pointer).filter(|v| !v.is_null())
}

pub fn to_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(Number::Int)
            .or_else(|| n.as_f64().map(Number::Float)),
        _ => None,
    }
}

/// Renders a number, or a string holding one, as a query parameter
pub fn to_param(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.trim().parse::<f64>().is_ok() => Some(s.trim().to_string()),
        _ => None,
    }
}
