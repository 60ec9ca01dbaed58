use rand::Rng;
use rand::seq::SliceRandom;

use crate::action::Action;
use crate::bot::{Bot, RowBot};
use crate::card::CardValue;
use crate::state::Observation;

/// Baseline bot that samples uniformly from the legal action set.
pub struct RandomBot<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Bot for RandomBot<R> {
    fn select_action(&mut self, _observation: &Observation, legal_actions: &[Action]) -> Action {
        legal_actions
            .choose(&mut self.rng)
            .copied()
            .expect("at least one legal action must be available")
    }
}

impl<R: Rng> RowBot for RandomBot<R> {
    fn select_row_action(&mut self, _observation: &[CardValue], legal_actions: &[usize]) -> usize {
        legal_actions
            .choose(&mut self.rng)
            .copied()
            .expect("at least one legal action must be available")
    }
}
