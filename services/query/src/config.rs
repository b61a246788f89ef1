use serde::Deserialize;

use expression::Limits;

#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct UpstreamConfig {
    pub airport_url: String,
    pub weather_url: String,
    pub stock_url: String,
    pub stock_host: String,
    pub rapidapi_key: Option<String>,
    /// Seconds
    pub timeout: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        UpstreamConfig {
            airport_url: "https://airport-data.com/api/ap_info.json".to_string(),
            weather_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            stock_url: "https://apidojo-yahoo-finance-v1.p.rapidapi.com/market/v2/get-summary"
                .to_string(),
            stock_host: "apidojo-yahoo-finance-v1.p.rapidapi.com".to_string(),
            rapidapi_key: None,
            timeout: 5,
        }
    }
}

#[derive(Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub upstream: UpstreamConfig,
    pub expression: Limits,
}
