use crate::config::BackendConfig;
use crate::models::*;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};

/// The three endpoints the panel talks to.
#[async_trait]
pub trait PdfBackend: Send + Sync {
    async fn list_pdfs(&self) -> Result<Vec<PdfKey>>;

    /// Returns whatever the backend answered with; callers only log it.
    async fn upload_pdf(&self, upload: &PdfUpload) -> Result<serde_json::Value>;

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse>;
}

pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    async fn ensure_success(response: Response, what: &str) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("{} failed with {}: {}", what, status, error_text));
        }
        Ok(response)
    }
}

#[async_trait]
impl PdfBackend for HttpBackend {
    async fn list_pdfs(&self) -> Result<Vec<PdfKey>> {
        let response = self.client
            .get(self.config.endpoint("pdfs"))
            .send()
            .await?;

        let response = Self::ensure_success(response, "Listing PDFs").await?;
        let list: PdfListResponse = response.json().await?;

        log::debug!("Backend returned {} PDF files", list.pdf_files.len());
        Ok(list.pdf_files)
    }

    async fn upload_pdf(&self, upload: &PdfUpload) -> Result<serde_json::Value> {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let response = self.client
            .post(self.config.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        let response = Self::ensure_success(response, "Upload").await?;
        let body = response.text().await?;

        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse> {
        let response = self.client
            .post(self.config.endpoint("ask"))
            .json(request)
            .send()
            .await?;

        let response = Self::ensure_success(response, "Ask").await?;
        let answer: AskResponse = response.json().await?;

        Ok(answer)
    }
}
