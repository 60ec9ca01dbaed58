use crate::action::Action;
use crate::card::CardValue;
use crate::state::Observation;

/// Interface for external Skyjo policies, heuristic or learned.
///
/// The engine hands over a copy of the acting player's observation together
/// with the legal actions; whatever comes back is validated by the engine.
/// Drivers only ask while the round is live, so `legal_actions` is never empty.
pub trait Bot {
    fn select_action(&mut self, observation: &Observation, legal_actions: &[Action]) -> Action;
}

/// Policy for the single-row game.
///
/// `observation` is the sorted masked row followed by the drawn card, as
/// returned by `RowGame::observation`; the answer is an index into the
/// sorted action space.
pub trait RowBot {
    fn select_row_action(&mut self, observation: &[CardValue], legal_actions: &[usize]) -> usize;
}
