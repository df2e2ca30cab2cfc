//! `Template` responder: fills a learned template with this turn's keywords.

use rand::RngCore;
use rand::seq::SliceRandom;

use super::{Request, Responder, random};
use crate::analyzer::keywords;
use crate::dictionary::{Dictionary, NOUN_PLACEHOLDER};
use crate::error::ResponderError;

pub struct TemplateResponder;

impl Responder for TemplateResponder {
    fn name(&self) -> &str {
        "Template"
    }

    fn respond(
        &self,
        request: &Request<'_>,
        dictionary: &Dictionary,
        rng: &mut dyn RngCore,
    ) -> Result<String, ResponderError> {
        let words = keywords(request.morphemes);
        if !words.is_empty() {
            let chosen = dictionary
                .templates_for(words.len())
                .and_then(|list| list.choose(rng));
            if let Some(template) = chosen {
                return Ok(fill(template, &words));
            }
        }
        random::pick(dictionary, rng, self.name())
    }
}

/// Replace placeholders left to right, one keyword each. Extra placeholders
/// (possible in hand-edited files) are left as they are.
fn fill(template: &str, words: &[&str]) -> String {
    let mut parts = template.split(NOUN_PLACEHOLDER);
    let mut out = parts.next().unwrap_or_default().to_string();
    for (i, part) in parts.enumerate() {
        out.push_str(words.get(i).copied().unwrap_or(NOUN_PLACEHOLDER));
        out.push_str(part);
    }
    out
}
