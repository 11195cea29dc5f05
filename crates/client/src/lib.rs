use reqwest::StatusCode;
use tracefall_core::config::Config;
use tracefall_core::error::{Result, TracefallError};
use tracefall_core::model::TraceSplitResults;
use tracing::debug;

/// Client for the upstream trace endpoint. Fetch failures surface as
/// [`TracefallError::Api`]; retry policy belongs to callers, never here.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .build()
            .map_err(|e| TracefallError::Api(format!("failed building http client: {e}")))?;

        Ok(Self {
            http,
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
            token: cfg.api_token.clone(),
        })
    }

    pub async fn fetch_trace(&self, trace_id: &str, limit: usize) -> Result<TraceSplitResults> {
        let url = trace_url(&self.base_url, trace_id);
        debug!(trace_id, limit, "fetching trace");

        let mut request = self.http.get(&url).query(&[("limit", limit.to_string())]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TracefallError::Api(format!("request to {url} failed: {e}")))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                return Err(TracefallError::Api(format!("trace {trace_id} not found")));
            }
            status => {
                return Err(TracefallError::Api(format!(
                    "unexpected status {status} from {url}"
                )));
            }
        }

        response
            .json::<TraceSplitResults>()
            .await
            .map_err(|e| TracefallError::Api(format!("failed decoding trace payload: {e}")))
    }
}

fn trace_url(base_url: &str, trace_id: &str) -> String {
    format!("{base_url}/trace/{trace_id}/")
}
