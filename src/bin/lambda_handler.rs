//! AWS Lambda handler for running calculator requests
//!
//! Accepts either a single calculation request or a `{"requests": [...]}` batch as JSON and
//! returns one result (or error message) per request, in request order.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use std::time::Instant;

use aws_lambda_events::event::lambda_function_urls::{
    LambdaFunctionUrlRequest, LambdaFunctionUrlResponse,
};
use fincalc::scenario::{self, CalculationRequest, ReportEntry, ScenarioFile, ScenarioRunner};
use fincalc::CalcResult;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::info;
use serde::Serialize;

/// Output returned to the caller
#[derive(Debug, Serialize)]
struct CalculationResponse {
    results: Vec<ReportEntry>,
    execution_time_ms: u64,
}

/// A body with a `requests` array is a batch; anything else is one request
fn parse_requests(body: &str) -> CalcResult<Vec<CalculationRequest>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.get("requests").is_some() {
        Ok(serde_json::from_value::<ScenarioFile>(value)?.requests)
    } else {
        Ok(vec![serde_json::from_value(value)?])
    }
}

fn respond(status_code: i64, body: Option<String>) -> Result<LambdaFunctionUrlResponse, Error> {
    let mut response = LambdaFunctionUrlResponse {
        status_code,
        headers: Default::default(),
        body,
        is_base64_encoded: false,
        cookies: Vec::new(),
    };
    response.headers.insert("content-type", "application/json".parse()?);
    response.headers.insert("access-control-allow-origin", "*".parse()?);
    response.headers.insert("access-control-allow-methods", "POST, OPTIONS".parse()?);
    response.headers.insert("access-control-allow-headers", "Content-Type".parse()?);
    Ok(response)
}

fn error_response(status_code: i64, message: &str) -> Result<LambdaFunctionUrlResponse, Error> {
    respond(status_code, Some(serde_json::json!({ "error": message }).to_string()))
}

async fn handler(
    event: LambdaEvent<LambdaFunctionUrlRequest>,
) -> Result<LambdaFunctionUrlResponse, Error> {
    let start = Instant::now();
    let request = event.payload;

    // CORS preflight
    if request.request_context.http.method.as_deref() == Some("OPTIONS") {
        return respond(200, None);
    }
    if request.is_base64_encoded {
        return error_response(400, "base64-encoded bodies are not supported");
    }

    let body = request.body.unwrap_or_default();
    let requests = match parse_requests(&body) {
        Ok(requests) => requests,
        Err(e) => return error_response(400, &format!("Invalid request: {}", e)),
    };

    let results = ScenarioRunner::new().run_batch(&requests);
    let response = CalculationResponse {
        results: scenario::report(&requests, results),
        execution_time_ms: start.elapsed().as_millis() as u64,
    };
    info!("Ran {} calculations in {} ms", requests.len(), response.execution_time_ms);

    respond(200, Some(serde_json::to_string(&response)?))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
