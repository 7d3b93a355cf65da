//! Query tokenizer and script helpers / 검색어 분리
//!
//! Queries are split on runs of whitespace after lowercasing. There is no
//! word segmentation: Korean text is matched by plain substring containment,
//! so `바나` matches `바나나`.

/// Tokenize a search query / 검색어를 토큰으로 분리
///
/// An empty result means "no filter".
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Check if a character is Hangul (syllable or jamo) / 한글 문자 여부
pub fn is_hangul(c: char) -> bool {
    matches!(c,
        '\u{1100}'..='\u{11ff}' |  // Hangul Jamo
        '\u{3130}'..='\u{318f}' |  // Hangul Compatibility Jamo
        '\u{a960}'..='\u{a97f}' |  // Hangul Jamo Extended-A
        '\u{ac00}'..='\u{d7af}' |  // Hangul Syllables
        '\u{d7b0}'..='\u{d7ff}'    // Hangul Jamo Extended-B
    )
}

/// Check if a character is a Han ideograph / 한자 여부
pub fn is_han(c: char) -> bool {
    matches!(c,
        '\u{4e00}'..='\u{9fff}' |    // CJK Unified Ideographs
        '\u{3400}'..='\u{4dbf}' |    // CJK Extension A
        '\u{f900}'..='\u{faff}' |    // CJK Compatibility Ideographs
        '\u{20000}'..='\u{2a6df}'    // CJK Extension B
    )
}
