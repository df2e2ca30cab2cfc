//! Responders: the four reply strategies.
//!
//! ```text
//! WhatResponder       echo the input back as a question
//! RandomResponder     any utterance from the random pool
//! PatternResponder    first keyword pattern that matches, else Random
//! TemplateResponder   template filled with this turn's keywords, else Random
//! ```
//!
//! All of them read the [`Dictionary`] through a shared reference; learning
//! is the engine's job.

mod pattern;
mod random;
mod template;
mod what;

pub use pattern::{MATCH_PLACEHOLDER, PatternResponder};
pub use random::RandomResponder;
pub use template::TemplateResponder;
pub use what::WhatResponder;

use rand::RngCore;

use crate::analyzer::Morpheme;
use crate::dictionary::Dictionary;
use crate::error::ResponderError;

/// One turn of user input as seen by a responder.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub text: &'a str,
    pub morphemes: &'a [Morpheme],
}

/// A reply strategy.
pub trait Responder {
    /// Display name shown in the console prompt.
    fn name(&self) -> &str;

    fn respond(
        &self,
        request: &Request<'_>,
        dictionary: &Dictionary,
        rng: &mut dyn RngCore,
    ) -> Result<String, ResponderError>;
}
