//! Search module - filter, rank and highlight over the in-memory dataset / 검색 모듈
//!
//! Architecture principles:
//! - Stateless per call: the caller hands in the full collection and gets back
//!   a fresh view plus the terms to highlight
//! - No I/O and no failure path: a blank or odd query degrades to "show everything"
//!
//! Pipeline:
//! - Tokenize: lowercase + whitespace split
//! - Filter: AND/OR substring containment on the question or the answer
//! - Sort: Korean-aware collation on the question text
//! - Highlight: wrap matched terms for display

pub mod collation;
pub mod engine;
pub mod highlight;
pub mod schema;
pub mod tokenizer;

pub use collation::{compare, sort_by_question, CollationKey};
pub use engine::{filter, matches, SearchEngine};
pub use highlight::{highlight, highlight_with, Marker};
pub use schema::{Combinator, Field, SearchMode, SearchOptions, SearchOutcome};
pub use tokenizer::tokenize;
