pub mod models;
pub mod config;
pub mod backend;
pub mod panel;

pub use models::*;
pub use config::BackendConfig;
pub use backend::{HttpBackend, PdfBackend};
pub use panel::{AskTicket, PdfQaPanel, SessionState};
