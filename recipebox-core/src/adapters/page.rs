//! In-memory page surface
//!
//! Stands in for the host page's DOM: one results container, its control
//! bindings, one error slot, and a pending redirect. The CLI writes it out
//! as a standalone HTML document.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::markup::escape_html;
use crate::domain::{ControlAction, ControlId, ResultsMarkup};
use crate::ports::ResultsView;

#[derive(Debug, Default, Clone)]
pub struct MemoryPage {
    markup: ResultsMarkup,
    html: String,
    bindings: BTreeMap<ControlId, ControlAction>,
    error: Option<String>,
    redirect: Option<String>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Container HTML as last written
    pub fn results_html(&self) -> &str {
        &self.html
    }

    /// Markup description behind the container HTML
    pub fn markup(&self) -> &ResultsMarkup {
        &self.markup
    }

    pub fn bindings(&self) -> &BTreeMap<ControlId, ControlAction> {
        &self.bindings
    }

    /// Path the page was sent to, if any
    pub fn redirected_to(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    /// Full HTML document with the error slot above the results
    pub fn to_document(&self, heading: &str) -> String {
        let error = match &self.error {
            Some(text) => format!(
                r#"<p class="text-danger error_msg">{}</p>"#,
                escape_html(text)
            ),
            None => String::new(),
        };
        format!(
            concat!(
                "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
                "<meta charset=\"utf-8\">\n<title>{title}</title>\n",
                "<link rel=\"stylesheet\" href=\"https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css\">\n",
                "</head>\n<body>\n<div class=\"container\">\n",
                "<div class=\"search_headers\"><h2>{title}</h2>{error}</div>\n",
                "<div class=\"row\" id=\"search_results\">{results}</div>\n",
                "</div>\n</body>\n</html>\n"
            ),
            title = escape_html(heading),
            error = error,
            results = self.html,
        )
    }

    /// Write the document to disk
    pub fn write_document(&self, path: &Path, heading: &str) -> Result<()> {
        std::fs::write(path, self.to_document(heading))
            .with_context(|| format!("Failed to write page to {}", path.display()))
    }
}

impl ResultsView for MemoryPage {
    fn replace_results(&mut self, markup: &ResultsMarkup) {
        self.html = markup.to_html();
        self.markup = markup.clone();
        self.bindings = markup.bindings().into_iter().collect();
    }

    fn clear_results(&mut self) {
        self.html.clear();
        self.markup = ResultsMarkup::default();
        self.bindings.clear();
    }

    fn show_error(&mut self, text: &str) {
        self.error = Some(text.to_string());
    }

    fn clear_error(&mut self) {
        self.error = None;
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn binding(&self, control: &ControlId) -> Option<ControlAction> {
        self.bindings.get(control).copied()
    }

    fn redirect(&mut self, path: &str) {
        self.redirect = Some(path.to_string());
    }
}
