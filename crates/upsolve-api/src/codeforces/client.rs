use std::time::Duration;

use serde::Deserialize;
use upsolve_core::Problem;

use crate::error::ApiError;

/// Thin client for the Codeforces problemset API.
///
/// Codeforces wraps every payload in an envelope with a `status` field, so a
/// `200` response can still carry a failure. Both transport errors and
/// `status: "FAILED"` envelopes surface as [`ApiError::Upstream`] with the
/// upstream comment attached.
#[derive(Debug, Clone)]
pub struct CodeforcesClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ProblemsetEnvelope {
    status: String,
    comment: Option<String>,
    result: Option<ProblemsetResult>,
}

#[derive(Debug, Deserialize)]
struct ProblemsetResult {
    problems: Vec<Problem>,
}

impl CodeforcesClient {
    /// Build a client with a bounded request timeout.
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Fetch all problems matching a tag expression.
    ///
    /// The `tags` value is forwarded verbatim; Codeforces treats
    /// `;`-separated tags as an AND filter.
    pub async fn fetch_problems(&self, tags: &str) -> Result<Vec<Problem>, ApiError> {
        let url = format!("{}/problemset.problems", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("tags", tags)])
            .send()
            .await
            .map_err(|err| upstream_error(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(upstream_error(format!(
                "Codeforces responded with HTTP {status}"
            )));
        }

        let envelope: ProblemsetEnvelope = response
            .json()
            .await
            .map_err(|err| upstream_error(err.to_string()))?;

        if envelope.status != "OK" {
            let comment = envelope
                .comment
                .unwrap_or_else(|| format!("Codeforces returned status {}", envelope.status));
            return Err(upstream_error(comment));
        }

        Ok(envelope
            .result
            .map(|result| result.problems)
            .unwrap_or_default())
    }
}

fn upstream_error(details: String) -> ApiError {
    ApiError::Upstream {
        message: "Failed to fetch problems from Codeforces".to_string(),
        details: Some(details),
    }
}
