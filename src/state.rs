use serde::{Deserialize, Serialize};

use crate::action::{Action, PlayerId};
use crate::card::CardValue;
use crate::deck::PlayerDeck;

/// Sub-turn state of the active player.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// Take the card on offer or draw a fresh one.
    NeedsDraw,
    /// Place the drawn card, or discard it and flip a hidden cell.
    NeedsPlacement,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Turn {
    pub player: PlayerId,
    pub phase: TurnPhase,
}

impl Turn {
    pub fn start() -> Self {
        Self {
            player: 0,
            phase: TurnPhase::NeedsDraw,
        }
    }
}

/// Constants of a running game, derived from its configuration.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameSettings {
    pub num_players: usize,
    pub n_cards: usize,
    pub rows: usize,
    pub cols: usize,
    pub initial_visible: usize,
    /// Expected value of a face-down card: the mean of the pile distribution.
    pub hidden_card_value: f64,
}

impl GameSettings {
    pub fn cells_per_deck(&self) -> usize {
        self.rows * self.cols
    }
}

/// What one player may see. Every field is an independent copy of engine state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Observation {
    pub player: PlayerId,
    /// Face-down cells read `HIDDEN_SENTINEL`.
    pub deck_values: Vec<Vec<CardValue>>,
    pub deck_mask: Vec<Vec<bool>>,
    pub visible_card: CardValue,
    pub turn: Turn,
}

/// Full engine state, including everything hidden from players.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSnapshot {
    pub pile: Vec<CardValue>,
    pub cursor: usize,
    pub decks: Vec<PlayerDeck>,
    pub turn: Turn,
    pub last_player: Option<PlayerId>,
    pub done: bool,
    pub latest_action: Option<Action>,
}
