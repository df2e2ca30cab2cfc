//! `What` responder: parrots the input back as a question.

use rand::RngCore;

use super::{Request, Responder};
use crate::dictionary::Dictionary;
use crate::error::ResponderError;

const SUFFIX: &str = "ってなに？";

pub struct WhatResponder;

impl Responder for WhatResponder {
    fn name(&self) -> &str {
        "What"
    }

    fn respond(
        &self,
        request: &Request<'_>,
        _dictionary: &Dictionary,
        _rng: &mut dyn RngCore,
    ) -> Result<String, ResponderError> {
        Ok(format!("{}{SUFFIX}", request.text))
    }
}
