//! Search query options and results / 검색 옵션과 결과 정의

use std::fmt;
use std::str::FromStr;

use crate::models::Entry;

/// Entry attribute a query is matched against / 검색 대상 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Question,
    Answer,
}

impl Field {
    pub fn text<'a>(&self, entry: &'a Entry) -> &'a str {
        match self {
            Field::Question => &entry.question,
            Field::Answer => &entry.answer,
        }
    }
}

/// How multiple tokens combine / 다중 검색어 결합 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    /// Every token must be contained
    And,
    /// At least one token must be contained
    #[default]
    Or,
}

/// Field × combinator selector, written as `question_or`, `answer_and`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchMode {
    pub field: Field,
    pub combinator: Combinator,
}

impl SearchMode {
    pub fn new(field: Field, combinator: Combinator) -> Self {
        Self { field, combinator }
    }

    /// Lenient parse: anything starting with `question` selects the question
    /// field (otherwise the answer), anything containing `and` selects AND
    /// (otherwise OR). Never fails.
    pub fn parse(mode: &str) -> Self {
        let mode = mode.trim().to_lowercase();
        let field = if mode.starts_with("question") {
            Field::Question
        } else {
            Field::Answer
        };
        let combinator = if mode.contains("and") {
            Combinator::And
        } else {
            Combinator::Or
        };
        Self { field, combinator }
    }
}

impl FromStr for SearchMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self.field {
            Field::Question => "question",
            Field::Answer => "answer",
        };
        let combinator = match self.combinator {
            Combinator::And => "and",
            Combinator::Or => "or",
        };
        write!(f, "{}_{}", field, combinator)
    }
}

/// Search query options / 검색 옵션
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Raw query text as typed
    pub query: String,
    pub mode: SearchMode,
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            mode: SearchMode::default(),
        }
    }

    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.mode.field = field;
        self
    }

    pub fn combinator(mut self, combinator: Combinator) -> Self {
        self.mode.combinator = combinator;
        self
    }
}

/// Search result / 검색 결과
///
/// `terms` is empty when the query was blank, in which case `view` holds the
/// whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub view: Vec<Entry>,
    pub terms: Vec<String>,
}

impl SearchOutcome {
    pub fn is_filtered(&self) -> bool {
        !self.terms.is_empty()
    }
}
