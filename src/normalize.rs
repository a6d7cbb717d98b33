//! Text normalisation used when comparing typed answers with Greek forms.

use unicode_normalization::UnicodeNormalization;

/// Removes diacritics from a string for accent-insensitive comparison.
///
/// Decomposes to NFD and drops combining marks in U+0300..=U+036F, which
/// also reduces ΐ and ΰ to their bare letters.
pub fn strip_greek_accents(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

fn is_greek_capital(c: char) -> bool {
    matches!(c, '\u{0386}' | '\u{0388}'..='\u{038f}' | '\u{0391}'..='\u{03ab}') && c.is_uppercase()
}

/// Folds Greek capital letters to lowercase, leaving accents and every
/// other character untouched. A capital sigma at the end of a word becomes
/// final `ς`.
///
/// ```
/// use greek_flashcards::normalize::fold_greek_case;
/// assert_eq!(fold_greek_case("ΣΊΓΜΑ"), "σίγμα");
/// assert_eq!(fold_greek_case("ΧΡΗΣΤΟΣ"), "χρηστος");
/// assert_eq!(fold_greek_case("Alpha"), "Alpha");
/// ```
pub fn fold_greek_case(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == 'Σ' {
            let after_letter = folded.chars().last().is_some_and(char::is_alphabetic);
            let word_end = !chars.peek().is_some_and(|next| next.is_alphabetic());
            folded.push(if after_letter && word_end {
                'ς'
            } else {
                'σ'
            });
        } else if is_greek_capital(c) {
            folded.extend(c.to_lowercase());
        } else {
            folded.push(c);
        }
    }
    folded
}

/// Comparison key: accents stripped, lowercased, final sigma unified with `σ`.
pub fn comparison_key(text: &str) -> String {
    strip_greek_accents(text).to_lowercase().replace('ς', "σ")
}

pub fn answers_match(input: &str, answer: &str) -> bool {
    comparison_key(input) == comparison_key(answer)
}
