//! Guesses the active keyboard layout from the characters being typed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardLanguage {
    Greek,
    Latin,
}

impl KeyboardLanguage {
    pub fn name(&self) -> &'static str {
        match self {
            KeyboardLanguage::Greek => "Greek (Ελληνικά)",
            KeyboardLanguage::Latin => "Latin (English)",
        }
    }
}

/// Greek and Coptic plus Greek Extended.
pub fn is_greek_char(c: char) -> bool {
    matches!(c, '\u{0370}'..='\u{03FF}' | '\u{1F00}'..='\u{1FFF}')
}

/// Script the user has to type for `answer`, judged by its first letter.
pub fn expected_language(answer: &str) -> Option<KeyboardLanguage> {
    answer.chars().find(|c| c.is_alphabetic()).map(|c| {
        if is_greek_char(c) {
            KeyboardLanguage::Greek
        } else {
            KeyboardLanguage::Latin
        }
    })
}

#[derive(Debug, Clone, Default)]
pub struct KeyboardDetector {
    language: Option<KeyboardLanguage>,
    last_key: Option<char>,
}

impl KeyboardDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Space, digits and punctuation leave the detected language unchanged.
    pub fn observe(&mut self, c: char) {
        if c.is_whitespace() || c.is_control() {
            return;
        }
        self.last_key = Some(c);
        if is_greek_char(c) {
            self.language = Some(KeyboardLanguage::Greek);
        } else if c.is_ascii_alphabetic() {
            self.language = Some(KeyboardLanguage::Latin);
        }
    }

    pub fn language(&self) -> Option<KeyboardLanguage> {
        self.language
    }

    pub fn last_key(&self) -> Option<char> {
        self.last_key
    }

    pub fn is_greek(&self) -> bool {
        self.language == Some(KeyboardLanguage::Greek)
    }

    /// True once a language has been detected and it differs from the one
    /// `answer` is written in.
    pub fn mismatches(&self, answer: &str) -> bool {
        match (self.language, expected_language(answer)) {
            (Some(current), Some(expected)) => current != expected,
            _ => false,
        }
    }
}
