use serde_json::Value;

use expression::Number;

use crate::client::{extract, to_number, to_param, UpstreamClient};
use crate::config::UpstreamConfig;
use crate::error::ApiError;

pub fn validate_iata(code: &str) -> Result<String, ApiError> {
    let iata = code.to_ascii_uppercase();
    if iata.len() != 3 || !iata.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ApiError::InvalidRequest(
            "IATA code must be three letters".to_string(),
        ));
    }
    Ok(iata)
}

pub fn validate_symbol(symbol: &str) -> Result<String, ApiError> {
    let symbol = symbol.to_ascii_uppercase();
    if !(1..=5).contains(&symbol.len()) || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::InvalidRequest(
            "Stock symbol must be 1-5 alphanumeric characters".to_string(),
        ));
    }
    Ok(symbol)
}

fn coordinates(info: &Value) -> Option<(String, String)> {
    let latitude = extract(info, "/latitude").and_then(to_param)?;
    let longitude = extract(info, "/longitude").and_then(to_param)?;
    Some((latitude, longitude))
}

fn temperature(weather: &Value) -> Result<Number, ApiError> {
    extract(weather, "/current_weather/temperature")
        .and_then(to_number)
        .ok_or_else(|| ApiError::InvalidRequest("Weather data not available".to_string()))
}

fn market_price(summary: &Value, symbol: &str) -> Result<Number, ApiError> {
    let quote = extract(summary, "/marketSummaryAndSparkResponse/result/0").ok_or_else(|| {
        ApiError::InvalidRequest(format!("Price for {} not available", symbol))
    })?;

    extract(quote, "/regularMarketPrice/raw")
        .and_then(to_number)
        .map(|price| Number::Float(price.as_float()))
        .ok_or_else(|| ApiError::InvalidRequest("Price not available".to_string()))
}

/// Answers the lookups backed by third-party APIs
pub struct LookupService {
    client: UpstreamClient,
    config: UpstreamConfig,
}

impl LookupService {
    pub fn new(client: UpstreamClient, config: UpstreamConfig) -> LookupService {
        LookupService { client, config }
    }

    /// Current temperature in celsius at the airport with IATA code `code`
    pub async fn airport_temperature(&self, code: &str) -> Result<Number, ApiError> {
        let iata = validate_iata(code)?;

        let info = self
            .client
            .fetch_json(&self.config.airport_url, &[("iata", iata.as_str())], &[])
            .await?;
        let (latitude, longitude) = coordinates(&info)
            .ok_or_else(|| ApiError::InvalidRequest(format!("Airport {} not found", iata)))?;

        let weather = self
            .client
            .fetch_json(
                &self.config.weather_url,
                &[
                    ("latitude", latitude.as_str()),
                    ("longitude", longitude.as_str()),
                    ("current_weather", "true"),
                    ("temperature_unit", "celsius"),
                ],
                &[],
            )
            .await?;
        temperature(&weather)
    }

    /// Latest market price of the stock `symbol`
    pub async fn stock_price(&self, symbol: &str) -> Result<Number, ApiError> {
        let symbol = validate_symbol(symbol)?;
        let key = self
            .config
            .rapidapi_key
            .as_deref()
            .ok_or_else(|| ApiError::InternalError("No RapidAPI key configured".to_string()))?;

        let summary = self
            .client
            .fetch_json(
                &self.config.stock_url,
                &[("symbol", symbol.as_str()), ("region", "US")],
                &[
                    ("x-rapidapi-key", key),
                    ("x-rapidapi-host", self.config.stock_host.as_str()),
                ],
            )
            .await?;
        market_price(&summary, &symbol)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn message(r: Result<Number, ApiError>) -> String {
        match r {
            Err(ApiError::InvalidRequest(m)) => m,
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn test_validate_iata() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(validate_iata("sfo").map_err(|e| format!("{:?}", e))?, "SFO");
        assert!(validate_iata("SF").is_err());
        assert!(validate_iata("SFOX").is_err());
        assert!(validate_iata("S1O").is_err());
        assert!(validate_iata("").is_err());
        assert!(validate_iata("ßfo").is_err());
        Ok(())
    }

    #[test]
    fn test_validate_symbol() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(validate_symbol("aapl").map_err(|e| format!("{:?}", e))?, "AAPL");
        assert_eq!(validate_symbol("brk1").map_err(|e| format!("{:?}", e))?, "BRK1");
        assert!(validate_symbol("").is_err());
        assert!(validate_symbol("TOOLONG").is_err());
        assert!(validate_symbol("BRK.B").is_err());
        Ok(())
    }

    #[test]
    fn test_coordinates() {
        let info = json!({"latitude": "37.618972", "longitude": "-122.374889"});
        assert_eq!(
            coordinates(&info),
            Some(("37.618972".to_string(), "-122.374889".to_string()))
        );
        assert_eq!(coordinates(&json!({"latitude": 1.5})), None);
        assert_eq!(coordinates(&json!({"error": "not found"})), None);
    }

    #[test]
    fn test_temperature() {
        let weather = json!({"current_weather": {"temperature": 14.2}});
        assert_eq!(temperature(&weather).ok(), Some(Number::Float(14.2)));
        assert_eq!(
            message(temperature(&json!({"current_weather": {}}))),
            "Weather data not available"
        );
    }

    #[test]
    fn test_market_price() {
        let summary = json!({
            "marketSummaryAndSparkResponse": {
                "result": [{"regularMarketPrice": {"raw": 187, "fmt": "187.00"}}]
            }
        });
        assert_eq!(
            market_price(&summary, "AAPL").ok(),
            Some(Number::Float(187.0))
        );

        let empty = json!({"marketSummaryAndSparkResponse": {"result": []}});
        assert_eq!(
            message(market_price(&empty, "AAPL")),
            "Price for AAPL not available"
        );

        let no_price = json!({"marketSummaryAndSparkResponse": {"result": [{}]}});
        assert_eq!(message(market_price(&no_price, "AAPL")), "Price not available");
    }

    #[tokio::test]
    async fn test_stock_price_requires_key() {
        let service = LookupService::new(
            UpstreamClient::new(reqwest::Client::new()),
            UpstreamConfig::default(),
        );
        match service.stock_price("AAPL").await {
            Err(ApiError::InternalError(_)) => (),
            other => panic!("{:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_codes_skip_upstream() {
        let config = UpstreamConfig {
            rapidapi_key: Some("key".to_string()),
            ..UpstreamConfig::default()
        };
        let service = LookupService::new(UpstreamClient::new(reqwest::Client::new()), config);

        assert_eq!(
            message(service.airport_temperature("12").await),
            "IATA code must be three letters"
        );
        assert_eq!(
            message(service.stock_price("TOOLONG").await),
            "Stock symbol must be 1-5 alphanumeric characters"
        );
    }
}
