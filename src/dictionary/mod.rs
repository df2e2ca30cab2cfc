//! Learning dictionary: the three stores every responder reads from.
//!
//! - random pool: every distinct utterance seen, in arrival order
//! - patterns: keyword -> utterances that contained it
//! - templates: keyword count -> utterances with their keywords blanked out
//!
//! The stores grow only through [`Dictionary::study`]. Responders get a
//! shared reference and never mutate. [`Dictionary::save`] rewrites all three
//! files in full.

pub mod format;

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::analyzer::{Morpheme, is_keyword};
use crate::error::AppError;

/// Placeholder written in place of each keyword in a template.
pub const NOUN_PLACEHOLDER: &str = "%noun%";

/// Locations of the three dictionary files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryPaths {
    pub random: PathBuf,
    pub pattern: PathBuf,
    pub template: PathBuf,
}

impl DictionaryPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            random: dir.join("random.txt"),
            pattern: dir.join("pattern.txt"),
            template: dir.join("template.txt"),
        }
    }
}

/// A keyword and the utterances it appeared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    pub keyword: String,
    pub phrases: Vec<String>,
}

impl PatternEntry {
    /// Appends `phrase` unless already present. Returns whether it was added.
    pub fn add_phrase(&mut self, phrase: &str) -> bool {
        if self.phrases.iter().any(|p| p == phrase) {
            return false;
        }
        self.phrases.push(phrase.to_string());
        true
    }
}

pub struct Dictionary {
    paths: DictionaryPaths,
    random: Vec<String>,
    patterns: Vec<PatternEntry>,
    templates: BTreeMap<usize, Vec<String>>,
}

impl Dictionary {
    /// In-memory dictionary with no backing data yet. Nothing touches disk
    /// until [`save`](Self::save).
    pub fn empty(paths: DictionaryPaths) -> Self {
        Self {
            paths,
            random: Vec::new(),
            patterns: Vec::new(),
            templates: BTreeMap::new(),
        }
    }

    /// Load all three stores, creating any missing file (and its directory)
    /// empty first.
    pub fn load(paths: DictionaryPaths) -> Result<Self, AppError> {
        let mut dict = Self::empty(paths);

        let random = read_touching(&dict.paths.random)?;
        for (_, line) in non_empty_lines(&random) {
            dict.learn_random(line);
        }

        let pattern = read_touching(&dict.paths.pattern)?;
        for (i, line) in non_empty_lines(&pattern) {
            match format::parse_pattern_line(line) {
                Ok(entry) => dict.merge_pattern(entry),
                Err(reason) => warn!(
                    file = %dict.paths.pattern.display(),
                    line = i + 1,
                    %reason,
                    "skipping malformed pattern line"
                ),
            }
        }

        let template = read_touching(&dict.paths.template)?;
        for (i, line) in non_empty_lines(&template) {
            match format::parse_template_line(line) {
                Ok((count, template)) => {
                    dict.learn_template(count, template);
                }
                Err(reason) => warn!(
                    file = %dict.paths.template.display(),
                    line = i + 1,
                    %reason,
                    "skipping malformed template line"
                ),
            }
        }

        info!(
            random = dict.random.len(),
            patterns = dict.patterns.len(),
            templates = dict.template_count(),
            "dictionary loaded"
        );
        Ok(dict)
    }

    // ── Read access ───────────────────────────────────────────────────

    pub fn random(&self) -> &[String] {
        &self.random
    }

    pub fn patterns(&self) -> &[PatternEntry] {
        &self.patterns
    }

    pub fn templates(&self) -> &BTreeMap<usize, Vec<String>> {
        &self.templates
    }

    /// Templates holding exactly `count` placeholders.
    pub fn templates_for(&self, count: usize) -> Option<&[String]> {
        self.templates.get(&count).map(Vec::as_slice)
    }

    /// Total templates across all counts.
    pub fn template_count(&self) -> usize {
        self.templates.values().map(Vec::len).sum()
    }

    // ── Learning ──────────────────────────────────────────────────────

    /// Learn from one utterance and its analysis. Never fails; repeated
    /// input leaves every store unchanged.
    pub fn study(&mut self, text: &str, morphemes: &[Morpheme]) {
        // One utterance must stay one line on disk.
        let text = text.replace(['\r', '\n'], " ");
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.study_random(text);
        self.study_pattern(text, morphemes);
        self.study_template(morphemes);
    }

    fn study_random(&mut self, text: &str) {
        if self.learn_random(text) {
            debug!(text, "learned utterance");
        }
    }

    fn study_pattern(&mut self, text: &str, morphemes: &[Morpheme]) {
        for m in morphemes.iter().filter(|m| is_keyword(&m.tag)) {
            match self.patterns.iter_mut().find(|p| p.keyword == m.surface) {
                Some(entry) => {
                    entry.add_phrase(text);
                }
                None => {
                    debug!(keyword = %m.surface, "new pattern");
                    self.patterns.push(PatternEntry {
                        keyword: m.surface.clone(),
                        phrases: vec![text.to_string()],
                    });
                }
            }
        }
    }

    fn study_template(&mut self, morphemes: &[Morpheme]) {
        let mut template = String::new();
        let mut count = 0;
        for m in morphemes {
            if is_keyword(&m.tag) {
                template.push_str(NOUN_PLACEHOLDER);
                count += 1;
            } else {
                template.push_str(&m.surface);
            }
        }
        if count > 0 && self.learn_template(count, template) {
            debug!(count, "learned template");
        }
    }

    fn learn_random(&mut self, text: &str) -> bool {
        if self.random.iter().any(|r| r == text) {
            return false;
        }
        self.random.push(text.to_string());
        true
    }

    fn learn_template(&mut self, count: usize, template: String) -> bool {
        let list = self.templates.entry(count).or_default();
        if list.contains(&template) {
            return false;
        }
        list.push(template);
        true
    }

    fn merge_pattern(&mut self, entry: PatternEntry) {
        match self.patterns.iter_mut().find(|p| p.keyword == entry.keyword) {
            Some(existing) => {
                for phrase in &entry.phrases {
                    existing.add_phrase(phrase);
                }
            }
            None => self.patterns.push(entry),
        }
    }

    // ── Persistence ───────────────────────────────────────────────────

    /// Rewrite all three files from the in-memory stores.
    ///
    /// Every file is staged next to its target before any is replaced, so a
    /// failure while staging leaves all three previous files untouched.
    pub fn save(&self) -> Result<(), AppError> {
        let random = to_lines(self.random.iter().cloned());
        let pattern = to_lines(self.patterns.iter().map(format::format_pattern_line));
        let template = to_lines(self.templates.iter().flat_map(|(count, list)| {
            list.iter().map(move |t| format::format_template_line(*count, t))
        }));

        let files = [
            (&self.paths.random, random),
            (&self.paths.pattern, pattern),
            (&self.paths.template, template),
        ];
        let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());
        for (path, data) in &files {
            match stage(path, data) {
                Ok(tmp) => staged.push((tmp, path.as_path())),
                Err(e) => {
                    discard(staged.iter().map(|(tmp, _)| tmp.as_path()));
                    return Err(e);
                }
            }
        }
        for (i, (tmp, path)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(tmp, path) {
                discard(staged[i..].iter().map(|(tmp, _)| tmp.as_path()));
                return Err(AppError::Dictionary(format!("cannot replace {}: {e}", path.display())));
            }
        }

        info!(
            random = self.random.len(),
            patterns = self.patterns.len(),
            templates = self.template_count(),
            "dictionary saved"
        );
        Ok(())
    }
}

fn non_empty_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .map(|l| l.trim_end_matches('\r'))
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
}

fn to_lines(lines: impl Iterator<Item = String>) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Read `path`, creating it (and its parent directory) empty if absent.
fn read_touching(path: &Path) -> Result<String, AppError> {
    if !path.exists() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Dictionary(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::Dictionary(format!("cannot create {}: {e}", path.display())))?;
        debug!(path = %path.display(), "created empty dictionary file");
    }
    fs::read_to_string(path)
        .map_err(|e| AppError::Dictionary(format!("cannot read {}: {e}", path.display())))
}

/// Write `data` to `<path>.tmp` and return that path. The caller renames it
/// over `path`. Nothing is left behind on failure.
fn stage(path: &Path, data: &str) -> Result<PathBuf, AppError> {
    if path.is_dir() {
        return Err(AppError::Dictionary(format!("cannot replace {}: is a directory", path.display())));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::Dictionary(format!("cannot create {}: {e}", parent.display())))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let written = fs::File::create(&tmp).and_then(|mut f| {
        f.write_all(data.as_bytes())?;
        f.sync_all()
    });
    if let Err(e) = written {
        discard([tmp.as_path()]);
        return Err(AppError::Dictionary(format!("cannot write {}: {e}", tmp.display())));
    }
    Ok(tmp)
}

fn discard<'a>(tmps: impl IntoIterator<Item = &'a Path>) {
    for tmp in tmps {
        if let Err(e) = fs::remove_file(tmp) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %tmp.display(), "cannot remove staged file: {e}");
            }
        }
    }
}
