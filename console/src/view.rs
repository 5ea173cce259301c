use pdf_qa::{PdfBackend, PdfQaPanel};

pub fn render<B: PdfBackend>(panel: &PdfQaPanel<B>) -> String {
    let mut out = String::new();

    out.push_str("Available PDFs\n");
    if panel.pdf_list().is_empty() {
        out.push_str("  (none)\n");
    }
    for (index, pdf) in panel.pdf_list().iter().enumerate() {
        let marker = if panel.selected_pdf() == Some(pdf.as_str()) { '>' } else { ' ' };
        out.push_str(&format!("{} {}. {}\n", marker, index + 1, pdf));
    }

    let Some(selected) = panel.selected_pdf() else {
        return out;
    };

    out.push('\n');
    out.push_str(&format!("SELECTED PDF: {}\n", selected));
    let button = if panel.ask_enabled() { "[ Ask ]" } else { "[ Asking... ]" };
    out.push_str(&format!("{}\n", button));
    if panel.answer_visible() {
        out.push_str(&format!("Answer: {}\n", panel.answer_text()));
    }

    out
}
