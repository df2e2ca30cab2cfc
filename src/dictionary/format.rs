//! Line formats of the persisted dictionary files.
//!
//! - `random.txt`: one utterance per line
//! - `pattern.txt`: `keyword<TAB>phrase1|phrase2|...`
//! - `template.txt`: `count<TAB>template`
//!
//! TAB and `|` are reserved and not escaped.

use super::PatternEntry;

pub const SEPARATOR: char = '\t';
pub const PHRASE_SEPARATOR: &str = "|";

/// Why a persisted line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    MissingSeparator,
    EmptyKeyword,
    NoPhrases,
    BadCount(String),
    EmptyTemplate,
}

impl std::fmt::Display for Malformed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Malformed::MissingSeparator => write!(f, "missing tab separator"),
            Malformed::EmptyKeyword => write!(f, "empty keyword"),
            Malformed::NoPhrases => write!(f, "no phrases"),
            Malformed::BadCount(c) => write!(f, "invalid keyword count '{c}'"),
            Malformed::EmptyTemplate => write!(f, "empty template"),
        }
    }
}

pub fn parse_pattern_line(line: &str) -> Result<PatternEntry, Malformed> {
    let (keyword, phrases) = line.split_once(SEPARATOR).ok_or(Malformed::MissingSeparator)?;
    if keyword.is_empty() {
        return Err(Malformed::EmptyKeyword);
    }
    let mut entry = PatternEntry { keyword: keyword.to_string(), phrases: Vec::new() };
    for phrase in phrases.split(PHRASE_SEPARATOR).filter(|p| !p.is_empty()) {
        entry.add_phrase(phrase);
    }
    if entry.phrases.is_empty() {
        return Err(Malformed::NoPhrases);
    }
    Ok(entry)
}

pub fn format_pattern_line(entry: &PatternEntry) -> String {
    let phrases = entry.phrases.join(PHRASE_SEPARATOR);
    format!("{}{SEPARATOR}{phrases}", entry.keyword)
}

pub fn parse_template_line(line: &str) -> Result<(usize, String), Malformed> {
    let (count, template) = line.split_once(SEPARATOR).ok_or(Malformed::MissingSeparator)?;
    let count = match count.trim().parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => return Err(Malformed::BadCount(count.to_string())),
    };
    if template.is_empty() {
        return Err(Malformed::EmptyTemplate);
    }
    Ok((count, template.to_string()))
}

pub fn format_template_line(count: usize, template: &str) -> String {
    format!("{count}{SEPARATOR}{template}")
}
