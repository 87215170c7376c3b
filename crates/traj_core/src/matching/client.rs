use std::time::Duration;

use reqwest::blocking::Client;

use super::error::MatchError;
use super::parser::parse_trace_response;
use super::request::TraceRequest;
use super::response::{TraceMatch, TraceRouteResponse};
use crate::params::MatchOptions;

/// Seam between the pipeline and the matching backend. Implementations
/// perform exactly one exchange per call and classify every outcome into
/// [`MatchError`]; nothing is raised past this boundary.
pub trait MatchService: Send + Sync {
    fn match_trace(&self, request: &TraceRequest) -> Result<TraceMatch, MatchError>;
}

/// Blocking HTTP client for a Valhalla-compatible `trace_route` endpoint.
#[derive(Debug, Clone)]
pub struct ValhallaClient {
    client: Client,
    endpoint: String,
}

impl ValhallaClient {
    /// Create a client for the configured endpoint. The per-call timeout is
    /// set on the underlying client; expiry surfaces as a transport error.
    pub fn new(options: &MatchOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()
            .expect("failed to build matching client");
        Self {
            client,
            endpoint: options.endpoint.trim_end_matches('/').to_string(),
        }
    }
}

impl MatchService for ValhallaClient {
    fn match_trace(&self, request: &TraceRequest) -> Result<TraceMatch, MatchError> {
        let url = format!("{}/trace_route", self.endpoint);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .map_err(MatchError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(MatchError::Status(status, body));
        }

        let parsed: TraceRouteResponse = response.json().map_err(MatchError::Json)?;
        parse_trace_response(parsed, request.shape.len())
    }
}
