//! Morphological analysis seam.
//!
//! The engine only needs `text -> [(surface, tag)]` plus a way to tell which
//! tags are keywords. Tags follow the IPADIC convention of comma-separated
//! part-of-speech fields (`名詞,固有名詞`, `助詞,格助詞`, ...), so any real
//! analyzer producing that vocabulary can be dropped in behind [`Analyzer`].

use std::sync::LazyLock;

use regex::Regex;

/// One analyzed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morpheme {
    pub surface: String,
    pub tag: String,
}

impl Morpheme {
    pub fn new(surface: impl Into<String>, tag: impl Into<String>) -> Self {
        Self { surface: surface.into(), tag: tag.into() }
    }
}

/// Splits a sentence into tagged morphemes.
pub trait Analyzer {
    fn analyze(&self, text: &str) -> Vec<Morpheme>;
}

static KEYWORD_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^名詞,(一般|代名詞|固有名詞|サ変接続|形容動詞語幹)").expect("keyword tag regex")
});

/// True for noun-like tags eligible for pattern and template learning.
pub fn is_keyword(tag: &str) -> bool {
    KEYWORD_TAG.is_match(tag)
}

/// Keyword surfaces in input order.
pub fn keywords(morphemes: &[Morpheme]) -> Vec<&str> {
    morphemes
        .iter()
        .filter(|m| is_keyword(&m.tag))
        .map(|m| m.surface.as_str())
        .collect()
}

// ── ScriptAnalyzer ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Kanji,
    Katakana,
    Hiragana,
    Latin,
    Digit,
    Space,
    Other,
}

impl Script {
    fn of(c: char) -> Self {
        match c {
            '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '々' | '〆' => Script::Kanji,
            '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}' => {
                Script::Katakana
            }
            '\u{3041}'..='\u{309F}' => Script::Hiragana,
            c if c.is_alphabetic() => Script::Latin,
            c if c.is_numeric() => Script::Digit,
            c if c.is_whitespace() => Script::Space,
            _ => Script::Other,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Script::Kanji => "名詞,一般",
            Script::Katakana | Script::Latin => "名詞,固有名詞",
            Script::Digit => "名詞,数",
            Script::Hiragana => "助詞,*",
            Script::Space | Script::Other => "記号,*",
        }
    }
}

/// Dependency-free fallback analyzer.
///
/// Groups consecutive characters of the same script into one morpheme. Kanji
/// and katakana runs approximate nouns, hiragana runs approximate particles and
/// inflections. Crude, but it keeps the bot usable without a system dictionary.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptAnalyzer;

impl Analyzer for ScriptAnalyzer {
    fn analyze(&self, text: &str) -> Vec<Morpheme> {
        let mut out = Vec::new();
        let mut current: Option<(Script, String)> = None;

        for c in text.chars() {
            let script = Script::of(c);
            match current.as_mut() {
                // Symbols never merge, each one is its own token.
                Some((s, run)) if *s == script && script != Script::Other => run.push(c),
                _ => {
                    if let Some((s, run)) = current.take() {
                        push_run(&mut out, s, run);
                    }
                    current = Some((script, c.to_string()));
                }
            }
        }
        if let Some((s, run)) = current {
            push_run(&mut out, s, run);
        }
        out
    }
}

fn push_run(out: &mut Vec<Morpheme>, script: Script, run: String) {
    if script != Script::Space {
        out.push(Morpheme::new(run, script.tag()));
    }
}
