//! Skyjo round engine for reinforcement learning workloads and bot experimentation.

pub mod action;
pub mod bot;
pub mod bots;
pub mod card;
pub mod deck;
pub mod error;
pub mod game;
pub mod pile;
pub mod row;
pub mod score;
pub mod state;

pub use crate::action::{Action, DrawChoice, PlacementChoice, PlayerId};
pub use crate::bot::{Bot, RowBot};
pub use crate::bots::RandomBot;
pub use crate::card::CardValue;
pub use crate::deck::PlayerDeck;
pub use crate::error::{GameError, InvalidAction};
pub use crate::game::{Game, GameBuilder, GameConfig, StepOutcome};
pub use crate::pile::Pile;
pub use crate::row::{RowConfig, RowGame, RowSnapshot, RowStep};
pub use crate::score::{
    FinalExpectedSum, GreedyDelta, RelativeToBest, RoundResult, TerminalScoring, step_reward,
};
pub use crate::state::{GameSettings, GameSnapshot, Observation, Turn, TurnPhase};
