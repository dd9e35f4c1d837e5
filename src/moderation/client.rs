use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::domain::ModerationResult;

/// Sampling parameters are pinned so that identical submissions score
/// identically across retries.
const TEMPERATURE: f64 = 0.0;
const TOP_P: f64 = 0.9;
const TOP_K: u32 = 20;
const FREQUENCY_PENALTY: f64 = 0.5;
const PRESENCE_PENALTY: f64 = 0.5;

#[derive(Debug, Error)]
pub enum ModerationError {
    /// The scoring endpoint could not be reached, timed out, or answered
    /// with a non-success status.
    #[error("moderation endpoint unavailable")]
    UpstreamUnavailable(#[from] reqwest::Error),

    /// The endpoint answered, but not in the agreed envelope-plus-inner-JSON
    /// shape.
    #[error("malformed moderation response: {0}")]
    MalformedResponse(String),
}

/// The outbound request body the scoring endpoint expects.
#[derive(Debug, Serialize)]
struct ScoringRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f64,
    top_p: f64,
    top_k: u32,
    frequency_penalty: f64,
    presence_penalty: f64,
    stream: bool,
    json_mode: bool,
}

/// The outer envelope the endpoint wraps its answer in. The `response`
/// string must be parsed a second time to get at the scored items.
#[derive(Debug, Deserialize)]
struct ScoringEnvelope {
    response: String,
}

/// A decoded scoring response, keeping the raw inner payload around for
/// administrator audit trails.
#[derive(Clone, Debug)]
pub struct ScoredSubmission {
    pub results: Vec<ModerationResult>,
    pub raw_response: String,
}

pub struct ModerationOptions {
    /// URL of the scoring endpoint.
    pub endpoint: String,
    /// Name of the model the endpoint should run.
    pub model: String,
    /// Upper bound on the whole HTTP exchange.
    pub timeout: Duration,
}

/// Client for the external text-scoring service that rules on project
/// submissions.
#[derive(Clone)]
pub struct ModerationClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl ModerationClient {
    pub fn new(options: ModerationOptions) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: options.endpoint,
            model: options.model,
        })
    }

    /// Score a submission's title and description.
    ///
    /// The call is synchronous from the caller's point of view and carries no
    /// retry. Every failure leaves the submission unmoderated; callers must
    /// not substitute a verdict of their own.
    pub async fn score(
        &self,
        title: &str,
        description: &str,
    ) -> Result<ScoredSubmission, ModerationError> {
        let prompt = scoring_prompt(title, description);
        let request = ScoringRequest {
            model: &self.model,
            prompt: &prompt,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            top_k: TOP_K,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
            stream: false,
            json_mode: true,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;

        debug!(bytes = body.len(), "Received moderation response.");

        decode_submission(&body)
    }
}

/// Decode the two-stage response body: the outer envelope, then the inner
/// JSON array of scored items. Each stage can fail independently.
fn decode_submission(body: &str) -> Result<ScoredSubmission, ModerationError> {
    let envelope: ScoringEnvelope = serde_json::from_str(body)
        .map_err(|err| ModerationError::MalformedResponse(format!("envelope: {}", err)))?;

    let results: Vec<ModerationResult> = serde_json::from_str(&envelope.response)
        .map_err(|err| ModerationError::MalformedResponse(format!("inner payload: {}", err)))?;

    Ok(ScoredSubmission {
        results,
        raw_response: envelope.response,
    })
}

fn scoring_prompt(title: &str, description: &str) -> String {
    format!(
        r#"Review the goal of a crowdfunding campaign. For each goal, report:

valid: true if the goal is ethical and positive, false if it is questionable or unethical, doubt if it raises concerns and needs further review.

reason: an explanation of why the goal is or is not considered ethical.

e, s, g: integer scores from 0 to 5 rating the goal's environmental, social, and governance impact.

Answer with a JSON array of objects carrying the fields id, valid, reason, e, s, and g. Do not include any other text.

Example answer:
[
    {{ "id": 1, "valid": "false", "reason": "Serves a personal goal: buying a car", "e": 0, "s": 0, "g": 0 }},
    {{ "id": 2, "valid": "true", "reason": "Charity: building an orphanage", "e": 2, "s": 5, "g": 3 }}
]

Here is the goal:
{}

{}"#,
        title, description
    )
}
