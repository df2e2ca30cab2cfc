//! `Pattern` responder: replies with a past utterance that shares a keyword
//! with the input.
//!
//! Entries are tried in dictionary order. The stored keyword is compiled as a
//! regular expression so hand-written pattern files can use regex syntax;
//! keywords that are not valid regexes are matched literally. Each keyword
//! is compiled once and cached for the life of the responder.

use std::cell::RefCell;
use std::collections::HashMap;

use rand::RngCore;
use rand::seq::SliceRandom;
use regex::Regex;
use tracing::trace;

use super::{Request, Responder, random};
use crate::dictionary::Dictionary;
use crate::error::ResponderError;

/// Replaced by the matched substring in the chosen phrase.
pub const MATCH_PLACEHOLDER: &str = "%match%";

#[derive(Default)]
pub struct PatternResponder {
    /// keyword -> compiled matcher
    compiled: RefCell<HashMap<String, Regex>>,
}

impl PatternResponder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Responder for PatternResponder {
    fn name(&self) -> &str {
        "Pattern"
    }

    fn respond(
        &self,
        request: &Request<'_>,
        dictionary: &Dictionary,
        rng: &mut dyn RngCore,
    ) -> Result<String, ResponderError> {
        let mut compiled = self.compiled.borrow_mut();
        for entry in dictionary.patterns() {
            if !compiled.contains_key(&entry.keyword) {
                let Some(re) = compile(&entry.keyword) else {
                    continue;
                };
                compiled.insert(entry.keyword.clone(), re);
            }
            let Some(re) = compiled.get(&entry.keyword) else {
                continue;
            };
            let Some(found) = re.find(request.text) else {
                continue;
            };
            if let Some(phrase) = entry.phrases.choose(rng) {
                trace!(keyword = %entry.keyword, "pattern matched");
                return Ok(phrase.replace(MATCH_PLACEHOLDER, found.as_str()));
            }
        }
        random::pick(dictionary, rng, self.name())
    }
}

fn compile(keyword: &str) -> Option<Regex> {
    Regex::new(keyword)
        .or_else(|_| Regex::new(&regex::escape(keyword)))
        .ok()
}
