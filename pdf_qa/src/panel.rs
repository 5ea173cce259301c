use crate::backend::PdfBackend;
use crate::models::*;
use anyhow::Result;

/// In-memory session state. Discarded with the panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub pdf_list: Vec<PdfKey>,
    pub selected_pdf: Option<PdfKey>,
    pub question_text: String,
    pub answer_text: String,
    pub phase: AskPhase,
}

/// An ask that has been started and whose response is still outstanding.
#[derive(Debug)]
pub struct AskTicket {
    request: AskRequest,
}

impl AskTicket {
    pub fn request(&self) -> &AskRequest {
        &self.request
    }
}

/// Lists PDFs, uploads new ones and runs question/answer round trips
/// against a single selected PDF.
///
/// Every network failure is handled here: list and upload failures are only
/// logged, ask failures turn into a fixed message in the answer area.
pub struct PdfQaPanel<B> {
    backend: B,
    state: SessionState,
}

impl<B: PdfBackend> PdfQaPanel<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: SessionState::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn pdf_list(&self) -> &[PdfKey] {
        &self.state.pdf_list
    }

    pub fn selected_pdf(&self) -> Option<&str> {
        self.state.selected_pdf.as_deref()
    }

    pub fn question_text(&self) -> &str {
        &self.state.question_text
    }

    pub fn answer_text(&self) -> &str {
        &self.state.answer_text
    }

    pub fn is_loading(&self) -> bool {
        self.state.phase == AskPhase::Loading
    }

    /// The question box and answer are only shown once a PDF is selected.
    pub fn chatbox_visible(&self) -> bool {
        self.state.selected_pdf.is_some()
    }

    pub fn answer_visible(&self) -> bool {
        !self.state.answer_text.is_empty()
    }

    pub fn ask_enabled(&self) -> bool {
        !self.is_loading()
    }

    /// First display of the panel.
    pub async fn mount(&mut self) {
        self.load_pdf_list().await;
    }

    pub async fn load_pdf_list(&mut self) {
        match self.backend.list_pdfs().await {
            Ok(pdf_files) => {
                log::info!("Loaded {} PDF files", pdf_files.len());
                self.state.pdf_list = pdf_files;
            }
            Err(e) => {
                log::error!("Error fetching PDF files: {:#}", e);
            }
        }
    }

    pub fn select_pdf(&mut self, id: impl Into<PdfKey>) {
        self.state.selected_pdf = Some(id.into());
    }

    pub fn update_question_text(&mut self, text: impl Into<String>) {
        self.state.question_text = text.into();
    }

    /// Starts an ask. `Err` carries an outcome that was settled without
    /// contacting the backend.
    pub fn begin_ask(&mut self) -> std::result::Result<AskTicket, AskOutcome> {
        if self.is_loading() {
            log::debug!("Ask ignored while another request is in flight");
            return Err(AskOutcome::Disabled);
        }

        if self.state.question_text.trim().is_empty() {
            self.state.answer_text = PROMPT_FOR_QUESTION.to_string();
            return Err(AskOutcome::EmptyQuestion);
        }

        self.state.phase = AskPhase::Loading;
        self.state.answer_text.clear();

        let pdf_key = self.state.selected_pdf.clone().unwrap_or_default();
        let request = AskRequest::single(pdf_key, self.state.question_text.clone());

        Ok(AskTicket { request })
    }

    /// Applies the response of a ticket started by `begin_ask`.
    pub fn finish_ask(&mut self, ticket: AskTicket, result: Result<AskResponse>) -> AskOutcome {
        let outcome = match result {
            Ok(response) => match response.first_answer() {
                Some(answer) => AskOutcome::Answered(answer.to_string()),
                None => AskOutcome::NoAnswer,
            },
            Err(e) => {
                log::error!(
                    "Error asking question about '{}': {:#}",
                    ticket.request.pdf_key,
                    e
                );
                AskOutcome::Failed
            }
        };

        self.state.answer_text = match &outcome {
            AskOutcome::Answered(answer) => answer.clone(),
            AskOutcome::NoAnswer => NO_ANSWER_AVAILABLE.to_string(),
            _ => ASK_FAILED.to_string(),
        };
        self.state.phase = AskPhase::Idle;
        self.state.question_text.clear();

        outcome
    }

    pub async fn ask_question(&mut self) -> AskOutcome {
        let ticket = match self.begin_ask() {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };

        let result = self.backend.ask(ticket.request()).await;
        self.finish_ask(ticket, result)
    }

    /// Uploads the chosen file and refreshes the list. `None` means nothing
    /// was chosen.
    pub async fn upload_pdf(&mut self, upload: Option<PdfUpload>) {
        let Some(upload) = upload else {
            return;
        };

        match self.backend.upload_pdf(&upload).await {
            Ok(response) => {
                log::info!("Uploaded {}: {}", upload.file_name, response);
                self.load_pdf_list().await;
            }
            Err(e) => {
                log::error!("Error uploading PDF {}: {:#}", upload.file_name, e);
            }
        }
    }
}
