//! Deck catalogue: the built-in Greek datasets plus CSV decks from disk.

use std::path::Path;

use crate::csv::{get_csv_files, load_csv};
use crate::models::QuizItem;

#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    /// Session key used by the persistence layer.
    pub key: String,
    pub title: String,
    pub prompt_label: String,
    pub items: Vec<QuizItem>,
}

impl Deck {
    pub fn new(key: &str, title: &str, prompt_label: &str, items: Vec<QuizItem>) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            prompt_label: prompt_label.to_string(),
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Both directions of every pair, `(greek, gloss)` then `(gloss, greek)`.
fn both_ways(pairs: &[(&str, &str)]) -> Vec<QuizItem> {
    pairs
        .iter()
        .flat_map(|(greek, gloss)| {
            let item = QuizItem::new(*greek, *gloss);
            let reversed = item.reversed();
            [item, reversed]
        })
        .collect()
}

const ALPHABET: &[(&str, &str)] = &[
    ("α", "alpha"),
    ("β", "beta"),
    ("γ", "gamma"),
    ("δ", "delta"),
    ("ε", "epsilon"),
    ("ζ", "zeta"),
    ("η", "eta"),
    ("θ", "theta"),
    ("ι", "iota"),
    ("κ", "kappa"),
    ("λ", "lambda"),
    ("μ", "mu"),
    ("ν", "nu"),
    ("ξ", "xi"),
    ("ο", "omicron"),
    ("π", "pi"),
    ("ρ", "rho"),
    ("σ", "sigma"),
    ("τ", "tau"),
    ("υ", "upsilon"),
    ("φ", "phi"),
    ("χ", "chi"),
    ("ψ", "psi"),
    ("ω", "omega"),
];

const NUMBERS: &[(&str, &str)] = &[
    ("ένα", "1"),
    ("δύο", "2"),
    ("τρία", "3"),
    ("τέσσερα", "4"),
    ("πέντε", "5"),
    ("έξι", "6"),
    ("επτά", "7"),
    ("οκτώ", "8"),
    ("εννέα", "9"),
    ("δέκα", "10"),
    ("έντεκα", "11"),
    ("δώδεκα", "12"),
    ("δεκατρία", "13"),
    ("δεκατέσσερα", "14"),
    ("δεκαπέντε", "15"),
    ("δεκαέξι", "16"),
    ("δεκαεπτά", "17"),
    ("δεκαοκτώ", "18"),
    ("δεκαεννέα", "19"),
    ("είκοσι", "20"),
];

const WEEKDAYS: &[(&str, &str)] = &[
    ("Δευτέρα", "Monday"),
    ("Τρίτη", "Tuesday"),
    ("Τετάρτη", "Wednesday"),
    ("Πέμπτη", "Thursday"),
    ("Παρασκευή", "Friday"),
    ("Σάββατο", "Saturday"),
    ("Κυριακή", "Sunday"),
];

const NAMES: &[(&str, &str)] = &[
    ("Ζωή", "Zoi"),
    ("Ελπίδα", "Elpida"),
    ("Αγάπη", "Agapi"),
    ("Χαρά", "Xara"),
    ("Έλσα", "Elsa"),
    ("Σωτήρης", "Sotiris"),
    ("Αλέξανδρος", "Alexandros"),
    ("Ελένη", "Elena"),
    ("Γεώργιος", "Georgios"),
    ("Μαρία", "Maria"),
    ("Δημήτρης", "Dimitris"),
    ("Κωνσταντίνος", "Konstantinos"),
    ("Κατερίνα", "Katerina"),
    ("Νικόλαος", "Nikolaos"),
    ("Άννα", "Anna"),
    ("Παναγιώτης", "Panagiotis"),
    ("Σοφία", "Sofia"),
    ("Ευαγγελία", "Evangelia"),
    ("Ιωάννης", "Ioannis"),
    ("Χρήστος", "Christos"),
];

const TO_BE: &[(&str, &str)] = &[
    // present
    ("είμαι", "I am"),
    ("είσαι", "you are"),
    ("είναι", "he is"),
    ("είναι", "she is"),
    ("είναι", "it is"),
    ("είμαστε", "we are"),
    ("είστε", "you are (plural)"),
    ("είναι", "they are"),
    // past (imperfect)
    ("ήμουν", "I was"),
    ("ήσουν", "you were"),
    ("ήταν", "he was"),
    ("ήταν", "she was"),
    ("ήταν", "it was"),
    ("ήμασταν", "we were"),
    ("ήσασταν", "you were (plural)"),
    ("ήταν", "they were"),
    // future
    ("θα είμαι", "I will be"),
    ("θα είσαι", "you will be"),
    ("θα είναι", "he will be"),
    ("θα είναι", "she will be"),
    ("θα είναι", "it will be"),
    ("θα είμαστε", "we will be"),
    ("θα είστε", "you will be (plural)"),
    ("θα είναι", "they will be"),
];

pub fn builtin_decks() -> Vec<Deck> {
    vec![
        Deck::new("alphabetGame", "Alphabet", "Type the Greek letter for:", both_ways(ALPHABET)),
        Deck::new("numbersGame", "Numbers", "Type the Greek word for:", both_ways(NUMBERS)),
        Deck::new("weekdaysGame", "Weekdays", "Type the Greek word for:", both_ways(WEEKDAYS)),
        Deck::new("namesGame", "Greek Names", "Type the name for:", both_ways(NAMES)),
        Deck::new("toBeGame", "To Be", "Type the translation of:", both_ways(TO_BE)),
    ]
}

/// Built-in decks followed by every non-empty CSV deck found in `decks_dir`.
pub fn load_catalogue(decks_dir: &Path) -> Vec<Deck> {
    let mut decks = builtin_decks();

    for path in get_csv_files(decks_dir) {
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
            continue;
        };
        match load_csv(&path) {
            Ok(items) if !items.is_empty() => {
                decks.push(Deck::new(
                    &format!("csv:{}", stem),
                    &stem,
                    "Type the answer for:",
                    items,
                ));
            }
            Ok(_) => tracing::debug!("Skipping empty deck {}", path.display()),
            Err(e) => tracing::warn!("Failed to read deck {}: {}", path.display(), e),
        }
    }

    decks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_decks_drill_both_directions() {
        for deck in builtin_decks() {
            assert!(!deck.is_empty(), "{} is empty", deck.key);
            assert_eq!(deck.len() % 2, 0);
            for pair in deck.items.chunks(2) {
                assert_eq!(pair[0].reversed(), pair[1]);
            }
        }
    }

    #[test]
    fn test_builtin_deck_keys_are_unique() {
        let decks = builtin_decks();
        let keys: HashSet<&str> = decks.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys.len(), decks.len());
    }

    #[test]
    fn test_numbers_deck_contents() {
        let decks = builtin_decks();
        let numbers = decks.iter().find(|d| d.key == "numbersGame").unwrap();
        assert_eq!(numbers.len(), 40);
        assert_eq!(numbers.items[0], QuizItem::new("ένα", "1"));
        assert_eq!(numbers.items[1], QuizItem::new("1", "ένα"));
    }

    #[test]
    fn test_load_catalogue_appends_csv_decks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("colours.csv"), "κόκκινο,red\nμπλε,blue\n").unwrap();
        std::fs::write(dir.path().join("empty.csv"), "\n,\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored,file").unwrap();

        let decks = load_catalogue(dir.path());
        let builtin = builtin_decks().len();
        assert_eq!(decks.len(), builtin + 1);

        let colours = decks.last().unwrap();
        assert_eq!(colours.key, "csv:colours");
        assert_eq!(colours.title, "colours");
        assert_eq!(colours.items[0], QuizItem::new("κόκκινο", "red"));
    }

    #[test]
    fn test_load_catalogue_without_directory() {
        let decks = load_catalogue(Path::new("/definitely/not/here"));
        assert_eq!(decks.len(), builtin_decks().len());
    }
}
