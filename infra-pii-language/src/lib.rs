//! PII entity detection backed by the Azure AI Language `:analyze-text` API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use redaction_domain::{DetectionError, PiiDetectionPort, PiiEntity};

const ANALYZE_TEXT_PATH: &str = "/language/:analyze-text";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const DOCUMENT_ID: &str = "1";

// Offsets must line up with how the redactor indexes text, so the request
// pins the backend to code point offsets instead of its UTF-16 default.
const STRING_INDEX_TYPE: &str = "UnicodeCodePoint";

#[derive(Debug, Clone)]
pub struct LanguageAdapterConfig {
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub api_version: String,
    pub document_language: String,
    pub request_timeout: Duration,
}

pub struct LanguagePiiAdapter {
    client: reqwest::Client,
    config: LanguageAdapterConfig,
}

impl LanguagePiiAdapter {
    pub fn new(config: LanguageAdapterConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn credentials(&self) -> Result<(&str, &str), DetectionError> {
        let endpoint = self.config.endpoint.as_deref().filter(|v| !v.is_empty());
        let key = self.config.access_key.as_deref().filter(|v| !v.is_empty());
        match (endpoint, key) {
            (Some(endpoint), Some(key)) => Ok((endpoint, key)),
            _ => Err(DetectionError::NotConfigured),
        }
    }
}

#[async_trait]
impl PiiDetectionPort for LanguagePiiAdapter {
    async fn detect_pii(&self, text: &str) -> Result<Vec<PiiEntity>, DetectionError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let (endpoint, key) = self.credentials()?;

        let url = format!(
            "{}{}?api-version={}",
            endpoint.trim_end_matches('/'),
            ANALYZE_TEXT_PATH,
            self.config.api_version
        );
        let body = AnalyzeTextRequest::pii_recognition(text, &self.config.document_language);

        let response = self
            .client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, key)
            .timeout(self.config.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(|err| DetectionError::ServiceFailure(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DetectionError::ServiceFailure(format!(
                "HTTP {status}: {detail}"
            )));
        }

        let envelope: AnalyzeTextResponse = response.json().await.map_err(|err| {
            DetectionError::ServiceFailure(format!("malformed response: {err}"))
        })?;

        let entities = map_entities(envelope)?;
        tracing::debug!(entity_count = entities.len(), "pii detection response mapped");
        Ok(entities)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeTextRequest {
    kind: &'static str,
    analysis_input: AnalysisInput,
    parameters: AnalysisParameters,
}

#[derive(Debug, Serialize)]
struct AnalysisInput {
    documents: Vec<AnalysisDocument>,
}

#[derive(Debug, Serialize)]
struct AnalysisDocument {
    id: &'static str,
    language: String,
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisParameters {
    string_index_type: &'static str,
}

impl AnalyzeTextRequest {
    fn pii_recognition(text: &str, language: &str) -> Self {
        Self {
            kind: "PiiEntityRecognition",
            analysis_input: AnalysisInput {
                documents: vec![AnalysisDocument {
                    id: DOCUMENT_ID,
                    language: language.to_string(),
                    text: text.to_string(),
                }],
            },
            parameters: AnalysisParameters {
                string_index_type: STRING_INDEX_TYPE,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeTextResponse {
    results: AnalyzeResults,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResults {
    #[serde(default)]
    documents: Vec<DocumentResult>,
    #[serde(default)]
    errors: Vec<DocumentError>,
}

#[derive(Debug, Deserialize)]
struct DocumentResult {
    id: String,
    #[serde(default)]
    entities: Vec<WireEntity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEntity {
    text: String,
    category: String,
    #[serde(default)]
    subcategory: Option<String>,
    confidence_score: f64,
    offset: usize,
    length: usize,
}

#[derive(Debug, Deserialize)]
struct DocumentError {
    id: String,
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

fn map_entities(envelope: AnalyzeTextResponse) -> Result<Vec<PiiEntity>, DetectionError> {
    if let Some(failed) = envelope
        .results
        .errors
        .iter()
        .find(|failure| failure.id == DOCUMENT_ID)
    {
        return Err(DetectionError::ServiceFailure(format!(
            "document error {}: {}",
            failed.error.code, failed.error.message
        )));
    }

    let document = envelope
        .results
        .documents
        .into_iter()
        .find(|document| document.id == DOCUMENT_ID)
        .ok_or_else(|| {
            DetectionError::ServiceFailure("response missing document result".to_string())
        })?;

    Ok(document.entities.into_iter().map(map_entity).collect())
}

fn map_entity(entity: WireEntity) -> PiiEntity {
    PiiEntity {
        text: entity.text,
        category: entity.category,
        subcategory: entity.subcategory,
        confidence_score: entity.confidence_score,
        offset: entity.offset,
        length: entity.length,
    }
}
