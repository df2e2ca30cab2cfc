//! `Random` responder: a uniformly chosen past utterance.

use rand::RngCore;
use rand::seq::SliceRandom;

use super::{Request, Responder};
use crate::dictionary::Dictionary;
use crate::error::ResponderError;

pub struct RandomResponder;

impl Responder for RandomResponder {
    fn name(&self) -> &str {
        "Random"
    }

    fn respond(
        &self,
        _request: &Request<'_>,
        dictionary: &Dictionary,
        rng: &mut dyn RngCore,
    ) -> Result<String, ResponderError> {
        pick(dictionary, rng, self.name())
    }
}

/// Shared fallback for the other responders. `responder` names the caller in
/// the error so the console can say who ran dry.
pub(super) fn pick(
    dictionary: &Dictionary,
    rng: &mut dyn RngCore,
    responder: &str,
) -> Result<String, ResponderError> {
    dictionary
        .random()
        .choose(rng)
        .cloned()
        .ok_or_else(|| ResponderError::EmptyDictionary { responder: responder.to_string() })
}
