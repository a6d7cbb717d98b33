use crate::models::QuizItem;
use std::fs;
use std::path::{Path, PathBuf};

pub fn get_csv_files(decks_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if decks_dir.is_dir()
        && let Ok(entries) = fs::read_dir(decks_dir)
    {
        for entry in entries.flatten() {
            if let Some(ext) = entry.path().extension()
                && ext == "csv"
            {
                files.push(entry.path());
            }
        }
    }

    files.sort();
    files
}

/// Reads a deck file: one `answer,prompt` pair per line.
pub fn load_csv(path: &Path) -> std::io::Result<Vec<QuizItem>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_deck(&content))
}

pub fn parse_deck(content: &str) -> Vec<QuizItem> {
    content
        .lines()
        .filter_map(parse_csv_line)
        .filter(|(answer, prompt)| !answer.trim().is_empty() && !prompt.trim().is_empty())
        .map(|(answer, prompt)| QuizItem::new(answer.trim(), prompt.trim()))
        .collect()
}

/// Splits a line into its two fields. Fields may be double-quoted, and a
/// doubled quote inside a quoted field stands for one quote character.
pub fn parse_csv_line(line: &str) -> Option<(String, String)> {
    let mut chars = line.chars().peekable();
    let mut answer = String::new();
    let mut prompt = String::new();
    let mut current_field = &mut answer;
    let mut in_quotes = false;
    let mut on_second_field = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => in_quotes = true,
            '"' => match chars.peek() {
                Some('"') => {
                    chars.next();
                    current_field.push('"');
                }
                Some(',') => {
                    chars.next();
                    in_quotes = false;
                    if !on_second_field {
                        current_field = &mut prompt;
                        on_second_field = true;
                    }
                }
                _ => {
                    in_quotes = false;
                    if !on_second_field {
                        current_field = &mut prompt;
                        on_second_field = true;
                    }
                }
            },
            ',' if !in_quotes && !on_second_field => {
                on_second_field = true;
                current_field = &mut prompt;
            }
            _ => current_field.push(c),
        }
    }

    Some((answer, prompt))
}
