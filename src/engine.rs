//! Dialogue engine: picks a responder per turn and learns from every input.
//!
//! Per turn:
//!   1. Roll an integer in `[0, total weight)`
//!   2. Pick the responder whose cumulative weight range holds the roll
//!   3. Analyze the input
//!   4. Ask the responder for a reply
//!   5. Study the input (always, even when step 4 failed)

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::analyzer::Analyzer;
use crate::dictionary::Dictionary;
use crate::error::{AppError, ResponderError};
use crate::responder::{
    PatternResponder, RandomResponder, Request, Responder, TemplateResponder, WhatResponder,
};

/// A responder and its share of the rolls.
pub struct Weighted {
    pub responder: Box<dyn Responder>,
    pub weight: u32,
}

/// Ordered responder table. Entry `i` owns the rolls from the sum of the
/// weights before it up to (not including) that sum plus its own weight.
pub struct WeightTable {
    entries: Vec<Weighted>,
    total: u32,
}

impl WeightTable {
    pub fn new(entries: Vec<Weighted>) -> Result<Self, AppError> {
        let total = entries
            .iter()
            .try_fold(0u32, |acc, e| acc.checked_add(e.weight))
            .ok_or_else(|| AppError::Config("responder weights overflow".into()))?;
        if total == 0 {
            return Err(AppError::Config("responder table has no weight".into()));
        }
        Ok(Self { entries, total })
    }

    /// Pattern 40, Template 30, Random 20, What 10.
    pub fn standard() -> Self {
        let entries: Vec<Weighted> = vec![
            Weighted { responder: Box::new(PatternResponder::new()), weight: 40 },
            Weighted { responder: Box::new(TemplateResponder), weight: 30 },
            Weighted { responder: Box::new(RandomResponder), weight: 20 },
            Weighted { responder: Box::new(WhatResponder), weight: 10 },
        ];
        Self { entries, total: 100 }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Index of the entry that owns `roll`, or `None` when `roll >= total`.
    pub fn pick(&self, roll: u32) -> Option<usize> {
        let mut upper = 0u32;
        for (i, e) in self.entries.iter().enumerate() {
            upper += e.weight;
            if roll < upper {
                return Some(i);
            }
        }
        None
    }

    pub fn responder(&self, index: usize) -> Option<&dyn Responder> {
        self.entries.get(index).map(|e| e.responder.as_ref())
    }
}

pub struct Engine {
    name: String,
    dictionary: Dictionary,
    analyzer: Box<dyn Analyzer>,
    table: WeightTable,
    rng: StdRng,
    responder_name: String,
}

impl Engine {
    pub fn new(name: impl Into<String>, dictionary: Dictionary, analyzer: Box<dyn Analyzer>) -> Self {
        Self {
            name: name.into(),
            dictionary,
            analyzer,
            table: WeightTable::standard(),
            rng: StdRng::from_entropy(),
            responder_name: WhatResponder.name().to_string(),
        }
    }

    /// Replace the random source with a seeded one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_table(mut self, table: WeightTable) -> Self {
        self.table = table;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Responder chosen on the most recent turn.
    pub fn responder_name(&self) -> &str {
        &self.responder_name
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Produce a reply to `text` and learn from it.
    pub fn turn(&mut self, text: &str) -> Result<String, ResponderError> {
        let roll = self.rng.gen_range(0..self.table.total());
        // `roll < total` always lands on an entry.
        let index = self.table.pick(roll).unwrap_or(0);
        let responder = &self.table.entries[index].responder;
        self.responder_name = responder.name().to_string();
        debug!(roll, responder = %self.responder_name, "responder selected");

        let morphemes = self.analyzer.analyze(text);
        let request = Request { text, morphemes: &morphemes };
        let reply = responder.respond(&request, &self.dictionary, &mut self.rng);

        self.dictionary.study(text, &morphemes);

        if let Err(e) = &reply {
            warn!(responder = %self.responder_name, "{e}");
        }
        reply
    }

    /// Persist the dictionary.
    pub fn save(&self) -> Result<(), AppError> {
        self.dictionary.save()
    }
}
