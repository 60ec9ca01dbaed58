use thiserror::Error;

use crate::action::PlayerId;
use crate::state::TurnPhase;

/// Errors that can occur when manipulating the game state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("player index {0} is out of range")]
    InvalidPlayer(PlayerId),
    #[error("player {actual} acted but it is player {expected}'s turn")]
    NotPlayersTurn { expected: PlayerId, actual: PlayerId },
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),
    #[error("round is already over")]
    GameOver,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Details of actions that are not in the legal set for the current turn.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidAction {
    #[error("action does not belong to the {phase:?} phase")]
    WrongPhase { phase: TurnPhase },
    #[error("cell ({row}, {col}) is outside the deck")]
    CellOutOfRange { row: usize, col: usize },
    #[error("cell ({row}, {col}) is already face up")]
    CellAlreadyVisible { row: usize, col: usize },
    #[error("action index {0} is out of range")]
    ActionIndex(usize),
    #[error("malformed action tuple {0:?}")]
    MalformedTuple([i32; 4]),
}
