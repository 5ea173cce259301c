use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Opaque key naming a previously uploaded PDF, as returned by the backend.
pub type PdfKey = String;

pub const PROMPT_FOR_QUESTION: &str = "Please enter a question.";
pub const NO_ANSWER_AVAILABLE: &str = "No answer available.";
pub const ASK_FAILED: &str = "Error getting an answer. Please try again.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfListResponse {
    pub pdf_files: Vec<PdfKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskRequest {
    pub pdf_key: PdfKey,
    pub questions: Vec<String>,
}

impl AskRequest {
    pub fn single(pdf_key: PdfKey, question: String) -> Self {
        Self {
            pdf_key,
            questions: vec![question],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub qa: Vec<QuestionAnswer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AskResponse {
    /// Only the first entry's answer is ever shown.
    pub fn first_answer(&self) -> Option<&str> {
        self.qa.first().map(|qa| qa.answer.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub answer: String,
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PdfUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Reads a chosen file from disk. Anything that is not a `.pdf` counts as
    /// no file chosen, the same filter the upload picker applies.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();

        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        let file_name = match path.file_name() {
            Some(name) if is_pdf => name.to_string_lossy().to_string(),
            _ => {
                log::warn!("Ignoring non-PDF file: {}", path.display());
                return Ok(None);
            }
        };

        let bytes = tokio::fs::read(path).await?;
        Ok(Some(Self { file_name, bytes }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AskPhase {
    #[default]
    Idle,
    Loading,
}

/// What a finished ask left in the answer area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    Answered(String),
    NoAnswer,
    Failed,
    EmptyQuestion,
    /// An ask was already in flight, so the request was not sent.
    Disabled,
}

impl AskOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, AskOutcome::Failed | AskOutcome::EmptyQuestion)
    }
}
