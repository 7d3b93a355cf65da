//! Terminal presenter / 터미널 출력
//!
//! Writes results, details and notices as plain lines to any `Write` sink.
//! Highlighting happens after truncation so markers are never cut in half.
//! Terms are wrapped in control-character placeholders first and swapped
//! for the real markup at the end, so a later term cannot match inside an
//! escape sequence inserted for an earlier one.

use std::io::{self, Stdout, Write};

use super::{format_answer, truncate, Markup, Notice, Presenter, ResultsView};
use crate::models::Entry;
use crate::search::{Marker, SearchEngine};

const OPEN_PLACEHOLDER: char = '\u{1}';
const CLOSE_PLACEHOLDER: char = '\u{2}';

pub struct TerminalPresenter<W: Write + Send> {
    out: W,
    engine: SearchEngine,
    markup: Markup,
    preview_chars: usize,
}

impl TerminalPresenter<Stdout> {
    /// Stdout with ANSI highlighting
    pub fn stdout(preview_chars: usize) -> Self {
        Self::new(io::stdout(), Markup::ansi(), preview_chars)
    }
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W, markup: Markup, preview_chars: usize) -> Self {
        Self {
            out,
            engine: SearchEngine::with_marker(Marker::new(
                OPEN_PLACEHOLDER.to_string(),
                CLOSE_PLACEHOLDER.to_string(),
            )),
            markup,
            preview_chars,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn highlight(&self, text: &str, terms: &[String]) -> String {
        self.engine
            .highlight(text, terms)
            .replace(OPEN_PLACEHOLDER, &self.markup.mark.open)
            .replace(CLOSE_PLACEHOLDER, &self.markup.mark.close)
    }

    /// Truncated, highlighted field text; `...` goes on after highlighting
    fn preview(&self, text: &str, terms: &[String]) -> String {
        let (head, cut) = truncate(text, self.preview_chars);
        let highlighted = self.highlight(head, terms);
        if cut {
            format!("{}...", highlighted)
        } else {
            highlighted
        }
    }

    fn write_block(&mut self, block: &str) {
        let result = self
            .out
            .write_all(block.as_bytes())
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn render_results(&mut self, view: &ResultsView<'_>) {
        let mut block = format!("Results ({})\n", view.count());
        for (i, entry) in view.entries.iter().enumerate() {
            let question = self.preview(&entry.question, view.terms);
            let answer = self.preview(&entry.answer, view.terms);
            block.push_str(&format!("{:>3}. {}\n     {}\n", i + 1, question, answer));
        }
        self.write_block(&block);
    }

    fn show_detail(&mut self, entry: &Entry, terms: &[String]) {
        let block = format!(
            "Q: {}\nA: {}\n",
            self.highlight(&entry.question, terms),
            self.highlight(&entry.answer, terms)
        );
        self.write_block(&block);
    }

    fn show_answer(&mut self, answer: &str) {
        let block = format!("AI insight\n{}\n", format_answer(answer, &self.markup));
        self.write_block(&block);
    }

    fn show_keywords(&mut self, keywords: &[String]) {
        let block = if keywords.is_empty() {
            "No recent searches\n".to_string()
        } else {
            format!("Recent: {}\n", keywords.join(", "))
        };
        self.write_block(&block);
    }

    fn notify(&mut self, notice: Notice) {
        let line = match notice {
            Notice::Saved(message) if message.is_empty() => "Saved.\n".to_string(),
            Notice::Saved(message) => format!("Saved. {}\n", message),
            Notice::Info(message) => format!("{}\n", message),
            Notice::Error(message) => format!("Error: {}\n", message),
        };
        self.write_block(&line);
    }
}
