use serde::{Deserialize, Serialize};

/// Container receiving every cleaned transcript blob.
pub const CLEANED_TRANSCRIPTIONS_CONTAINER: &str = "cleaned-transcriptions";

pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// A PII occurrence reported by the detection backend.
///
/// `offset` and `length` are Unicode code point indices into the source text;
/// the detection adapter pins the backend to that unit and the redactor
/// indexes the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiiEntity {
    pub text: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub confidence_score: f64,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone)]
pub struct StoredArtifact {
    pub container_name: String,
    pub blob_name: String,
    pub content: Vec<u8>,
    pub content_type: &'static str,
}

impl StoredArtifact {
    /// Blob layout for a cleaned transcript. The blob name is derived only
    /// from the transcript id, so a repeated id overwrites the prior blob.
    pub fn cleaned_transcript(id: &str, text: &str) -> Self {
        Self {
            container_name: CLEANED_TRANSCRIPTIONS_CONTAINER.to_string(),
            blob_name: format!("{id}_cleaned.txt"),
            content: text.as_bytes().to_vec(),
            content_type: TEXT_PLAIN_UTF8,
        }
    }
}
