//! UCD vocabulary gate
//!
//! A UCD is one or more `;`-separated words from the IVOA UCD1+ controlled
//! vocabulary, e.g. `pos.eq.ra;meta.main`. Each word carries a placement
//! class: some words may only lead a UCD, some may only follow.
//!
//! `Ucd1Plus` embeds the UCD1+ word list (`ucd1plus.txt`). Callers with a
//! different vocabulary implement `TagVocabulary` themselves; any
//! `Fn(&str) -> bool` also works.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Decides whether a semantic tag is a recognized term.
pub trait TagVocabulary {
    fn is_recognized_tag(&self, tag: &str) -> bool;
}

impl<F> TagVocabulary for F
where
    F: Fn(&str) -> bool,
{
    fn is_recognized_tag(&self, tag: &str) -> bool {
        self(tag)
    }
}

/// Where a UCD word may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Only as the first word (P)
    Primary,
    /// Only after the first word (S)
    Secondary,
    /// Anywhere (Q, E, C, V)
    Either,
}

impl Placement {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "P" => Some(Placement::Primary),
            "S" => Some(Placement::Secondary),
            "Q" | "E" | "C" | "V" => Some(Placement::Either),
            _ => None,
        }
    }
}

/// `<code> | <word>` lines; `#` starts a comment.
const UCD_WORD_LIST: &str = include_str!("ucd1plus.txt");

/// Lowercased word to placement, parsed once.
fn words() -> &'static HashMap<String, Placement> {
    static WORDS: OnceLock<HashMap<String, Placement>> = OnceLock::new();
    WORDS.get_or_init(|| parse_word_list(UCD_WORD_LIST))
}

/// Lines with an unknown code or no word are skipped.
fn parse_word_list(text: &str) -> HashMap<String, Placement> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut columns = line.split('|').map(str::trim);
            let placement = Placement::from_code(columns.next()?)?;
            let word = columns.next().filter(|word| !word.is_empty())?;
            Some((word.to_ascii_lowercase(), placement))
        })
        .collect()
}

/// The built-in UCD1+ vocabulary.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ucd1Plus;

impl Ucd1Plus {
    /// Placement class of a single word, if the word is known.
    pub fn placement(word: &str) -> Option<Placement> {
        words().get(&word.to_ascii_lowercase()).copied()
    }
}

impl TagVocabulary for Ucd1Plus {
    fn is_recognized_tag(&self, tag: &str) -> bool {
        let words: Vec<&str> = tag.split(';').map(str::trim).collect();
        if words.iter().any(|word| word.is_empty()) {
            return false;
        }

        words.iter().enumerate().all(|(index, word)| match Self::placement(word) {
            Some(Placement::Primary) => index == 0,
            Some(Placement::Secondary) => index > 0,
            Some(Placement::Either) => true,
            None => false,
        })
    }
}
