//! Korean-aware collation / 한국어 정렬
//!
//! Text is compatibility-decomposed (NFKD) first. That splits every Hangul
//! syllable into its initial, medial and optional final jamo, and maps
//! compatibility jamo (ㄱ, ㅏ, ...) onto the same conjoining jamo, so
//! comparing the decomposed sequences orders syllables by consonant/vowel
//! rather than by raw code point. Accents fall away as combining marks.
//!
//! Ordering levels:
//! 1. primary: script group, then letter (Latin compared case-insensitively)
//! 2. tertiary: lowercase before uppercase
//! 3. raw code points, so distinct strings never compare equal
//!
//! Script groups follow the Korean locale, which reorders Hangul and Han
//! ahead of the other scripts: whitespace < punctuation/symbols < digits <
//! Hangul < Han < Latin < other alphabets < everything else.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::tokenizer::{is_han, is_hangul};
use crate::models::Entry;

const GROUP_SHIFT: u32 = 21;

const GROUP_SPACE: u32 = 1;
const GROUP_SYMBOL: u32 = 2;
const GROUP_DIGIT: u32 = 3;
const GROUP_HANGUL: u32 = 4;
const GROUP_HAN: u32 = 5;
const GROUP_LATIN: u32 = 6;
const GROUP_ALPHABET: u32 = 7;
const GROUP_OTHER: u32 = 8;

/// Precomputed sort key; `Ord` on the key is the collation order
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: Vec<u32>,
    tertiary: Vec<u8>,
    raw: String,
}

impl CollationKey {
    pub fn new(text: &str) -> Self {
        let mut primary = Vec::with_capacity(text.len());
        let mut tertiary = Vec::with_capacity(text.len());

        for c in text.nfkd() {
            if is_combining_mark(c) {
                continue;
            }
            primary.push(primary_weight(c));
            tertiary.push(u8::from(c.is_uppercase()));
        }

        Self {
            primary,
            tertiary,
            raw: text.to_string(),
        }
    }
}

fn primary_weight(c: char) -> u32 {
    let (group, value) = if c.is_whitespace() {
        (GROUP_SPACE, c as u32)
    } else if c.is_numeric() {
        (GROUP_DIGIT, c.to_digit(10).unwrap_or(c as u32))
    } else if is_latin(c) {
        (GROUP_LATIN, fold_case(c) as u32)
    } else if is_hangul(c) {
        (GROUP_HANGUL, c as u32)
    } else if is_han(c) {
        (GROUP_HAN, c as u32)
    } else if c.is_alphabetic() {
        (GROUP_ALPHABET, fold_case(c) as u32)
    } else if c.is_control() {
        (GROUP_OTHER, c as u32)
    } else {
        (GROUP_SYMBOL, c as u32)
    };
    (group << GROUP_SHIFT) | value
}

fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(c,
            '\u{00c0}'..='\u{024f}' |  // Latin-1 Supplement .. Latin Extended-B
            '\u{1e00}'..='\u{1eff}'    // Latin Extended Additional
        ) && c.is_alphabetic()
}

fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Compare two strings in collation order
pub fn compare(a: &str, b: &str) -> Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}

/// Stable sort by question text / 질문 기준 정렬
pub fn sort_by_question(entries: &mut [Entry]) {
    entries.sort_by_cached_key(|entry| CollationKey::new(&entry.question));
}
