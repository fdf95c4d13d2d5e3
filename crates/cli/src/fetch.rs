//! Blocking HTTP record source for the OpenCellID area endpoint.

use crate::SourceRequest;
use cellpath::compute::source::{RecordSource, parse_cells_response};
use cellpath::{CandidateRecord, CellpathError, GridCell};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches one grid cell per request over HTTP.
pub struct HttpSource {
    client: Client,
    request: SourceRequest,
}

impl HttpSource {
    pub fn new(request: SourceRequest) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("cellpath/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, request })
    }
}

impl RecordSource for HttpSource {
    fn fetch(&mut self, cell: &GridCell) -> cellpath::Result<Vec<CandidateRecord>> {
        let url = self
            .request
            .query
            .request_url(&self.request.base_url, &self.request.api_key, cell);
        debug!("GET {}", self.request.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| CellpathError::Source(format!("Request failed: {}", e)))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| CellpathError::Source(format!("Failed to read response: {}", e)))?;
        response_records(status, &body)
    }
}

/// Records of one response; any non-2xx status is a failed cell.
fn response_records(status: StatusCode, body: &str) -> cellpath::Result<Vec<CandidateRecord>> {
    if !status.is_success() {
        return Err(CellpathError::Source(format!("HTTP status {}", status)));
    }
    parse_cells_response(body)
}
