mod repl;
mod view;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pdf_qa::{BackendConfig, HttpBackend, PdfQaPanel, PdfUpload};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "pdfqa",
    version,
    about = "List, upload and ask questions about PDFs on a Q&A backend"
)]
struct Cli {
    /// Backend base URL (overrides PDFQA_BACKEND_URL)
    #[arg(long, global = true, value_name = "URL")]
    backend_url: Option<String>,

    /// Request timeout in seconds (overrides PDFQA_TIMEOUT_SECS)
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive panel (default)
    Interactive,
    /// Print the available PDFs, one per line
    List,
    /// Upload a PDF, then print the refreshed list
    Upload {
        /// Path to the PDF file
        file: PathBuf,
    },
    /// Ask one question about a PDF and print the answer
    Ask {
        /// Key of the PDF as listed by the backend
        #[arg(short, long)]
        pdf: String,

        /// The question
        #[arg(required = true)]
        question: Vec<String>,
    },
}

fn resolve_config(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<BackendConfig> {
    BackendConfig::resolve(
        cli.backend_url.clone(),
        cli.timeout.map(Duration::from_secs),
        env,
    )
}

/// The list fetch fails silently, so one-shot commands say why nothing was printed.
fn empty_list_hint(pdf_list: &[String], base_url: &str) -> Option<String> {
    pdf_list.is_empty().then(|| {
        format!(
            "No PDFs listed by {} (the backend may be unreachable, see the log)",
            base_url
        )
    })
}

fn print_list(pdf_list: &[String], base_url: &str) {
    for pdf in pdf_list {
        println!("{}", pdf);
    }
    if let Some(hint) = empty_list_hint(pdf_list, base_url) {
        eprintln!("{}", hint);
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = resolve_config(&cli, |key| std::env::var(key).ok())?;
    log::debug!("Using backend at {}", config.base_url);
    let base_url = config.base_url.clone();
    let mut panel = PdfQaPanel::new(HttpBackend::new(config)?);

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => repl::run(&mut panel).await?,
        Commands::List => {
            panel.mount().await;
            print_list(panel.pdf_list(), &base_url);
        }
        Commands::Upload { file } => {
            let upload = PdfUpload::from_path(&file).await?;
            panel.upload_pdf(upload).await;
            print_list(panel.pdf_list(), &base_url);
        }
        Commands::Ask { pdf, question } => {
            panel.select_pdf(pdf);
            panel.update_question_text(question.join(" "));
            let outcome = panel.ask_question().await;
            println!("{}", panel.answer_text());
            if outcome.is_failure() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
