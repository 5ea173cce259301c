use crate::view;
use anyhow::Result;
use pdf_qa::{PdfBackend, PdfQaPanel, PdfUpload};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Commands:
  list | refresh        reload the PDF list
  select <n|name>       select a PDF by number or name
  ask [question]        ask about the selected PDF
  upload [path]         upload a PDF and reload the list
  help                  show this help
  quit | exit           leave
Any other line is asked as a question.";

#[derive(Debug, PartialEq)]
pub enum Command {
    Refresh,
    Select(String),
    Ask(Option<String>),
    Upload(Option<PathBuf>),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    // Bare keywords are commands; a keyword followed by more words is a question.
    match (word.to_ascii_lowercase().as_str(), arg) {
        ("", _) => Command::Ask(None),
        ("list" | "refresh", None) => Command::Refresh,
        ("select", Some(id)) => Command::Select(id),
        ("select", None) => Command::Help,
        ("ask", arg) => Command::Ask(arg),
        ("upload", arg) => Command::Upload(arg.map(PathBuf::from)),
        ("help" | "?", None) => Command::Help,
        ("quit" | "exit", None) => Command::Quit,
        _ => Command::Ask(Some(line.to_string())),
    }
}

/// A 1-based index into the list, or the name itself.
pub fn resolve_selection(pdf_list: &[String], arg: &str) -> String {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 && n <= pdf_list.len() => pdf_list[n - 1].clone(),
        _ => arg.to_string(),
    }
}

/// Applies one command to the panel. Returns false when the session should end.
pub async fn execute<B: PdfBackend>(panel: &mut PdfQaPanel<B>, command: Command) -> Result<bool> {
    match command {
        Command::Refresh => panel.load_pdf_list().await,
        Command::Select(arg) => {
            let id = resolve_selection(panel.pdf_list(), &arg);
            panel.select_pdf(id);
        }
        Command::Ask(text) => {
            if let Some(text) = text {
                panel.update_question_text(text);
            }
            panel.ask_question().await;
        }
        Command::Upload(path) => {
            let upload = match path {
                Some(path) => PdfUpload::from_path(&path).await?,
                None => None,
            };
            panel.upload_pdf(upload).await;
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

pub async fn run<B: PdfBackend>(panel: &mut PdfQaPanel<B>) -> Result<()> {
    panel.mount().await;
    print!("{}", view::render(panel));
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match execute(panel, parse_command(&line)).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                continue;
            }
        }
        print!("{}", view::render(panel));
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use pdf_qa::{AskRequest, AskResponse, PdfKey, QuestionAnswer, PROMPT_FOR_QUESTION};
    use std::sync::Mutex;

    /// Always lists the same PDFs and gives the same answer.
    pub(crate) struct StaticBackend {
        pdfs: Vec<PdfKey>,
        answer: String,
        pub(crate) asked: Mutex<Vec<AskRequest>>,
        pub(crate) uploaded: Mutex<Vec<String>>,
    }

    impl StaticBackend {
        pub(crate) fn with(pdfs: &[&str], answer: &str) -> Self {
            Self {
                pdfs: pdfs.iter().map(|p| p.to_string()).collect(),
                answer: answer.to_string(),
                asked: Mutex::new(Vec::new()),
                uploaded: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PdfBackend for StaticBackend {
        async fn list_pdfs(&self) -> Result<Vec<PdfKey>> {
            Ok(self.pdfs.clone())
        }

        async fn upload_pdf(&self, upload: &PdfUpload) -> Result<serde_json::Value> {
            self.uploaded.lock().unwrap().push(upload.file_name.clone());
            Ok(serde_json::json!({ "message": "Upload successful" }))
        }

        async fn ask(&self, request: &AskRequest) -> Result<AskResponse> {
            self.asked.lock().unwrap().push(request.clone());
            Ok(AskResponse {
                qa: vec![QuestionAnswer {
                    question: request.questions.first().cloned(),
                    answer: self.answer.clone(),
                }],
                message: None,
            })
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("list"), Command::Refresh);
        assert_eq!(parse_command("  REFRESH "), Command::Refresh);
        assert_eq!(parse_command("select 2"), Command::Select("2".into()));
        assert_eq!(parse_command("select My File.pdf"), Command::Select("My File.pdf".into()));
        assert_eq!(parse_command("select"), Command::Help);
        assert_eq!(parse_command("ask"), Command::Ask(None));
        assert_eq!(parse_command("ask  why? "), Command::Ask(Some("why?".into())));
        assert_eq!(parse_command("upload ./a.pdf"), Command::Upload(Some(PathBuf::from("./a.pdf"))));
        assert_eq!(parse_command("upload"), Command::Upload(None));
        assert_eq!(parse_command("exit"), Command::Quit);
        assert_eq!(parse_command(""), Command::Ask(None));
        assert_eq!(parse_command("HELP"), Command::Help);
        assert_eq!(parse_command("?"), Command::Help);
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(
            parse_command("What is the total?"),
            Command::Ask(Some("What is the total?".into()))
        );
    }

    #[test]
    fn keyword_led_questions_are_asked() {
        for question in [
            "Exit criteria in section 2?",
            "List the parties to the contract",
            "Help desk hours?",
            "Refresh rate of the display?",
            "quit claim deed terms",
            "? what is this",
        ] {
            assert_eq!(parse_command(question), Command::Ask(Some(question.to_string())));
        }
    }

    #[tokio::test]
    async fn keyword_led_question_keeps_session_open() {
        let mut panel = PdfQaPanel::new(StaticBackend::with(&["a.pdf"], "Tuesday"));
        panel.select_pdf("a.pdf");

        let keep_going = execute(&mut panel, parse_command("Exit criteria in section 2?"))
            .await
            .unwrap();

        assert!(keep_going);
        assert_eq!(panel.answer_text(), "Tuesday");
        let asked = panel.backend().asked.lock().unwrap().clone();
        assert_eq!(asked[0].questions, vec!["Exit criteria in section 2?"]);
    }

    #[test]
    fn selection_by_index_or_name() {
        let list = vec!["a.pdf".to_string(), "b.pdf".to_string()];
        assert_eq!(resolve_selection(&list, "2"), "b.pdf");
        assert_eq!(resolve_selection(&list, "3"), "3");
        assert_eq!(resolve_selection(&list, "0"), "0");
        assert_eq!(resolve_selection(&list, "c.pdf"), "c.pdf");
    }

    #[tokio::test]
    async fn session_flow() {
        let mut panel = PdfQaPanel::new(StaticBackend::with(&["a.pdf", "b.pdf"], "42"));
        panel.mount().await;

        assert!(execute(&mut panel, parse_command("select 1")).await.unwrap());
        assert!(execute(&mut panel, parse_command("")).await.unwrap());
        assert_eq!(panel.answer_text(), PROMPT_FOR_QUESTION);

        assert!(execute(&mut panel, parse_command("How many?")).await.unwrap());
        assert_eq!(panel.answer_text(), "42");
        let asked = panel.backend().asked.lock().unwrap().clone();
        assert_eq!(asked, vec![AskRequest::single("a.pdf".into(), "How many?".into())]);

        assert!(!execute(&mut panel, parse_command("quit")).await.unwrap());
    }

    #[tokio::test]
    async fn upload_skips_non_pdf_files() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes.txt");
        let pdf = dir.path().join("scan.pdf");
        std::fs::write(&text, b"hello").unwrap();
        std::fs::write(&pdf, b"%PDF-1.5").unwrap();
        let mut panel = PdfQaPanel::new(StaticBackend::with(&[], "unused"));

        execute(&mut panel, Command::Upload(Some(text))).await.unwrap();
        execute(&mut panel, Command::Upload(None)).await.unwrap();
        execute(&mut panel, Command::Upload(Some(pdf))).await.unwrap();

        assert_eq!(*panel.backend().uploaded.lock().unwrap(), vec!["scan.pdf"]);
    }

    #[tokio::test]
    async fn missing_upload_file_is_reported() {
        let mut panel = PdfQaPanel::new(StaticBackend::with(&[], "unused"));
        let result = execute(&mut panel, Command::Upload(Some(PathBuf::from("/nonexistent/x.pdf")))).await;
        assert!(result.is_err());
        assert!(panel.backend().uploaded.lock().unwrap().is_empty());
    }
}
