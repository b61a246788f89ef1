#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate rocket;

use std::error::Error;
use std::sync::Arc;

use log::{error, info};
use reqwest::ClientBuilder;
use tokio::time::Duration;

use crate::client::UpstreamClient;
use crate::lookup::LookupService;

mod api;
mod client;
mod config;
mod error;
mod lookup;

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let figment = rocket_util::figment();
    let config: config::Config = figment.extract()?;

    let http_client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.upstream.timeout))
        .build()?;

    let lookup = LookupService::new(UpstreamClient::new(http_client), config.upstream.clone());
    info!(
        "Evaluating expressions with max depth {} and at most {} operators",
        config.expression.max_depth, config.expression.max_operators
    );

    let result = rocket::custom(figment)
        .manage(Arc::new(lookup))
        .manage(config.expression)
        .mount("/", api::routes())
        .launch()
        .await;

    if let Err(e) = result {
        error!("Rocket exited with error: {}", e);
        return Err(e.to_string().into());
    }
    Ok(())
}
