//! Presentation boundary / 화면 출력 경계
//!
//! The controller hands its output (filtered view, active terms, notices,
//! AI answers) to a [`Presenter`]. Rendering details such as preview length
//! and markup live entirely on this side of the boundary.

mod terminal;

pub use terminal::TerminalPresenter;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Entry;
use crate::search::Marker;

/// What a results render receives / 결과 목록 출력 데이터
#[derive(Debug, Clone, Copy)]
pub struct ResultsView<'a> {
    pub entries: &'a [Entry],
    /// Terms to highlight; empty when nothing is filtered
    pub terms: &'a [String],
}

impl ResultsView<'_> {
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

/// User-facing notification / 사용자 알림
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Save round-trip confirmed, carries the service message
    Saved(String),
    Info(String),
    Error(String),
}

/// Renderer interface / 렌더러 인터페이스
pub trait Presenter: Send {
    fn render_results(&mut self, view: &ResultsView<'_>);

    /// Full entry, highlighted with the active terms
    fn show_detail(&mut self, entry: &Entry, terms: &[String]);

    fn show_answer(&mut self, answer: &str);

    fn show_keywords(&mut self, keywords: &[String]);

    fn notify(&mut self, notice: Notice);
}

/// Markup used by a presenter for highlights, emphasis and line breaks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    pub mark: Marker,
    pub strong: Marker,
    pub line_break: String,
}

impl Markup {
    pub fn html() -> Self {
        Self {
            mark: Marker::default(),
            strong: Marker::new("<strong>", "</strong>"),
            line_break: "<br>".to_string(),
        }
    }

    pub fn ansi() -> Self {
        Self {
            mark: Marker::new("\x1b[1;33m", "\x1b[0m"),
            strong: Marker::new("\x1b[1m", "\x1b[0m"),
            line_break: "\n".to_string(),
        }
    }
}

/// Cut `text` to its first `max_chars` characters / 미리보기 자르기
///
/// The flag tells whether anything was cut, so the caller can append `...`
/// after highlighting the kept part.
pub fn truncate(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => (&text[..cut], true),
        None => (text, false),
    }
}

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));

/// Turn the AI service's light markdown into presenter markup / AI 답변 서식
///
/// Newlines become line breaks, `**text**` becomes emphasis.
pub fn format_answer(answer: &str, markup: &Markup) -> String {
    let with_breaks = answer.replace('\n', &markup.line_break);
    BOLD.replace_all(&with_breaks, |caps: &regex::Captures| {
        format!("{}{}{}", markup.strong.open, &caps[1], markup.strong.close)
    })
    .into_owned()
}
