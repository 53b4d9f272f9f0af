use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::Translator;

/// Default address of the GhanaNLP translation API
pub const DEFAULT_BASE_URL: &str = "https://translation-api.ghananlp.org";

/// Header carrying the subscription key
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Khaya client for the GhanaNLP translation endpoint
#[derive(Debug, Clone)]
pub struct Khaya {
    /// Full URL of the translate endpoint
    endpoint: Url,
    /// Subscription key
    api_key: String,
    /// HTTP client for making requests
    client: Client,
}

/// Translate request body
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct KhayaRequest {
    /// Text to translate
    #[serde(rename = "in")]
    pub text: String,
    /// Language pair such as "en-tw"
    pub lang: String,
}

/// Error object the service returns instead of a translation
#[derive(Debug, Deserialize)]
struct KhayaErrorBody {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl Khaya {
    /// Create a new client
    ///
    /// `base_url` may omit the scheme, in which case https is assumed.
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let endpoint = translate_endpoint(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            api_key: api_key.into(),
            client,
        })
    }

    /// Get the translate endpoint URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send a translate request and return the translated text
    pub async fn complete(&self, request: KhayaRequest) -> Result<String, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::AuthenticationError("API key is required".to_string()));
        }

        debug!("POST {} ({} chars, {})", self.endpoint, request.text.chars().count(), request.lang);

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .header("Cache-Control", "no-cache")
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            error!("Khaya API error ({}): {}", status, body);
            return Err(status_error(status, &body));
        }

        parse_translation(&body)
    }
}

#[async_trait]
impl Translator for Khaya {
    async fn translate(&self, text: &str, language_pair: &str) -> Result<String, ProviderError> {
        self.complete(KhayaRequest {
            text: text.to_string(),
            lang: language_pair.to_string(),
        })
        .await
    }

    fn name(&self) -> &str {
        "khaya"
    }
}

/// Build `<base>/v1/translate` from a base URL
fn translate_endpoint(base_url: &str) -> Result<Url, ProviderError> {
    let base_url = base_url.trim().trim_end_matches('/');
    if base_url.is_empty() {
        return Err(ProviderError::RequestFailed("Base URL cannot be empty".to_string()));
    }

    let with_scheme = if base_url.starts_with("http://") || base_url.starts_with("https://") {
        base_url.to_string()
    } else {
        format!("https://{}", base_url)
    };

    Url::parse(&format!("{}/v1/translate", with_scheme))
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid base URL '{}': {}", base_url, e)))
}

fn classify_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::RequestFailed(format!("Request timed out: {}", error))
    } else if error.is_connect() {
        ProviderError::ConnectionError(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

/// Map a non-success status to a provider error
fn status_error(status: StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<KhayaErrorBody>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.trim().to_string());

    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(message),
        429 => ProviderError::RateLimitExceeded(message),
        400 | 404 | 422 => ProviderError::Rejected(message),
        code => ProviderError::ApiError {
            status_code: code,
            message,
        },
    }
}

/// Extract the translation from a successful response body.
///
/// The service answers with a JSON string; an object carrying `type` and
/// `message` is a service-reported error.
fn parse_translation(body: &str) -> Result<String, ProviderError> {
    let body = body.trim();

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(text)) => Ok(text),
        Ok(serde_json::Value::Object(map)) => {
            let error: KhayaErrorBody = serde_json::from_value(serde_json::Value::Object(map))
                .map_err(|e| ProviderError::ParseError(e.to_string()))?;
            match (error.kind, error.message) {
                (Some(kind), message) => Err(ProviderError::Rejected(format!(
                    "{}: {}",
                    kind,
                    message.unwrap_or_else(|| "Unknown API error".to_string())
                ))),
                (None, _) => Err(ProviderError::ParseError(format!(
                    "Unexpected response object: {}",
                    body
                ))),
            }
        }
        Ok(other) => Err(ProviderError::ParseError(format!("Unexpected response type: {}", other))),
        // Plain text is accepted, broken JSON and markup are not
        Err(_) if !body.is_empty() && !body.starts_with(['"', '{', '[', '<']) => Ok(body.to_string()),
        Err(e) => Err(ProviderError::ParseError(format!(
            "Malformed response body ({}): {}",
            e,
            preview(body)
        ))),
    }
}

/// First characters of a body, for error messages
fn preview(body: &str) -> String {
    const MAX_CHARS: usize = 80;
    let mut preview: String = body.chars().take(MAX_CHARS).collect();
    if body.chars().count() > MAX_CHARS {
        preview.push_str("...");
    }
    preview
}
