use std::sync::Arc;

use log::debug;
use rocket::http::Status;
use rocket::serde::json::{json, Value};
use rocket::{Route, State};

use expression::{evaluate, Limits, Number};
use rocket_util::{Formatted, ResultFormat};
use telemetry::Measure;

use crate::error::ApiError;
use crate::lookup::LookupService;

lazy_static! {
    static ref AIRPORT_MEASURE: Measure = Measure::new("controller", "airport_temp");
    static ref STOCK_MEASURE: Measure = Measure::new("controller", "stock_price");
    static ref EVAL_MEASURE: Measure = Measure::new("controller", "eval");
}

#[derive(Debug, FromForm)]
struct QueryParams {
    #[field(name = "queryAirportTemp")]
    airport_temp: Option<String>,
    #[field(name = "queryStockPrice")]
    stock_price: Option<String>,
    #[field(name = "queryEval")]
    eval: Option<String>,
}

#[derive(Debug, PartialEq)]
enum Lookup {
    AirportTemp(String),
    StockPrice(String),
    Eval(String),
}

impl QueryParams {
    fn into_lookup(self) -> Result<Lookup, ApiError> {
        match (self.airport_temp, self.stock_price, self.eval) {
            (Some(code), None, None) => Ok(Lookup::AirportTemp(code)),
            (None, Some(symbol), None) => Ok(Lookup::StockPrice(symbol)),
            (None, None, Some(expr)) => Ok(Lookup::Eval(expr)),
            _ => Err(ApiError::InvalidRequest(
                "Exactly one of queryAirportTemp, queryStockPrice or queryEval must be provided"
                    .to_string(),
            )),
        }
    }
}

fn eval(expr: &str, limits: &Limits) -> Result<Number, ApiError> {
    evaluate(expr, limits).map_err(|e| {
        debug!("Rejected expression {:?}: {}", expr, e);
        ApiError::from(e)
    })
}

#[get("/?<params..>")]
async fn query(
    params: QueryParams,
    format: ResultFormat,
    lookup: &State<Arc<LookupService>>,
    limits: &State<Limits>,
) -> Result<Formatted<Number>, ApiError> {
    let value = match params.into_lookup()? {
        Lookup::AirportTemp(code) => {
            AIRPORT_MEASURE
                .stats(lookup.airport_temperature(&code))
                .await?
        }
        Lookup::StockPrice(symbol) => STOCK_MEASURE.stats(lookup.stock_price(&symbol)).await?,
        Lookup::Eval(expr) => EVAL_MEASURE.observe(|| eval(&expr, limits.inner()))?,
    };

    Ok(Formatted::new(format, value))
}

#[get("/status")]
fn status() -> Value {
    json!({ "status": "ok" })
}

#[get("/metrics")]
fn metrics() -> Result<String, Status> {
    telemetry::encode().map_err(|_| Status::InternalServerError)
}

pub fn routes() -> Vec<Route> {
    routes![status, metrics, query]
}
