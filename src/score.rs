//! Rewards for Skyjo rounds.
//!
//! Step rewards are greedy: the drop in the acting player's expected deck total,
//! counting face-down cards at the pile mean. Draw actions resolve nothing and
//! earn 0. What the round-ending step is worth is left to a [`TerminalScoring`]
//! policy.

use serde::{Deserialize, Serialize};

use crate::action::PlayerId;

/// Reward for a placement: lowering one's expected total is positive.
#[inline]
pub fn step_reward(expected_before: f64, expected_after: f64) -> f64 {
    -(expected_after - expected_before)
}

/// Per-player totals at the moment a round ends.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoundResult {
    /// Player whose action ended the round.
    pub acting_player: PlayerId,
    /// Expected totals with face-down cards at the pile mean.
    pub expected_totals: Vec<f64>,
    /// True totals with every card turned over.
    pub face_totals: Vec<i32>,
}

impl RoundResult {
    /// Players with the lowest face total.
    pub fn leaders(&self) -> Vec<PlayerId> {
        let Some(&best) = self.face_totals.iter().min() else {
            return Vec::new();
        };
        self.face_totals
            .iter()
            .enumerate()
            .filter(|&(_, &total)| total == best)
            .map(|(id, _)| id)
            .collect()
    }
}

/// Decides the reward of the step that ends a round.
pub trait TerminalScoring: Send {
    fn terminal_reward(&self, step_reward: f64, round: &RoundResult) -> f64;
}

/// Keeps the greedy step reward; the round end carries no extra signal.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyDelta;

impl TerminalScoring for GreedyDelta {
    fn terminal_reward(&self, step_reward: f64, _round: &RoundResult) -> f64 {
        step_reward
    }
}

/// Replaces the last reward with the acting player's negated expected total.
#[derive(Clone, Copy, Debug, Default)]
pub struct FinalExpectedSum;

impl TerminalScoring for FinalExpectedSum {
    fn terminal_reward(&self, _step_reward: f64, round: &RoundResult) -> f64 {
        round
            .expected_totals
            .get(round.acting_player)
            .map(|total| -total)
            .unwrap_or(0.0)
    }
}

/// Compares the acting player's true total against the best opponent:
/// positive when the actor finishes below everyone else.
#[derive(Clone, Copy, Debug, Default)]
pub struct RelativeToBest;

impl TerminalScoring for RelativeToBest {
    fn terminal_reward(&self, _step_reward: f64, round: &RoundResult) -> f64 {
        let Some(&own) = round.face_totals.get(round.acting_player) else {
            return 0.0;
        };
        let best_opponent = round
            .face_totals
            .iter()
            .enumerate()
            .filter(|&(id, _)| id != round.acting_player)
            .map(|(_, &total)| total)
            .min();
        match best_opponent {
            Some(best) => (best - own) as f64,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round() -> RoundResult {
        RoundResult {
            acting_player: 1,
            expected_totals: vec![20.0, 12.5, 30.0],
            face_totals: vec![18, 9, 9],
        }
    }

    #[test]
    fn reward_is_negative_delta() {
        assert_eq!(step_reward(40.0, 30.0), 10.0);
        assert_eq!(step_reward(30.0, 35.0), -5.0);
    }

    #[test]
    fn greedy_keeps_step_reward() {
        assert_eq!(GreedyDelta.terminal_reward(3.5, &round()), 3.5);
    }

    #[test]
    fn final_expected_sum_uses_acting_player() {
        assert_eq!(FinalExpectedSum.terminal_reward(3.5, &round()), -12.5);
    }

    #[test]
    fn relative_to_best_compares_against_opponents_only() {
        assert_eq!(RelativeToBest.terminal_reward(0.0, &round()), 0.0);
        let mut ahead = round();
        ahead.face_totals = vec![18, 4, 9];
        assert_eq!(RelativeToBest.terminal_reward(0.0, &ahead), 5.0);
    }

    #[test]
    fn leaders_include_ties() {
        assert_eq!(round().leaders(), vec![1, 2]);
    }
}
