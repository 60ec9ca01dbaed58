//! Single-player, single-row Skyjo with a sort-based action space.
//!
//! Every step draws a card. Action 0 discards it and turns the leftmost hidden
//! cell face up; action `k` in `1..=grid_len` swaps it with the `k`-th cell of
//! the row sorted ascending, face-down cells first. Policies therefore never see
//! the arbitrary left-to-right order of the row.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::card::{CardValue, STANDARD_CARD_COUNT, mean_card_value};
use crate::deck::PlayerDeck;
use crate::error::{GameError, InvalidAction};
use crate::game::DEFAULT_SEED;
use crate::pile::Pile;
use crate::score::step_reward;

pub const DEFAULT_GRID_LEN: usize = 3;
pub const DEFAULT_MAX_ROUNDS: usize = 10;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RowConfig {
    pub grid_len: usize,
    pub max_rounds: usize,
    pub initial_visible: usize,
    /// Subtract `1 / max_rounds` from every non-terminal reward.
    pub round_penalty: bool,
    pub seed: u64,
}

impl Default for RowConfig {
    fn default() -> Self {
        Self {
            grid_len: DEFAULT_GRID_LEN,
            max_rounds: DEFAULT_MAX_ROUNDS,
            initial_visible: 0,
            round_penalty: false,
            seed: DEFAULT_SEED,
        }
    }
}

impl RowConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.grid_len == 0 {
            return Err(GameError::InvalidConfiguration("row must hold at least one card"));
        }
        if self.max_rounds == 0 {
            return Err(GameError::InvalidConfiguration("max rounds must be positive"));
        }
        if self.initial_visible > self.grid_len {
            return Err(GameError::InvalidConfiguration(
                "initial visible cells exceed the row length",
            ));
        }
        if self.grid_len >= STANDARD_CARD_COUNT {
            return Err(GameError::InvalidConfiguration("row is longer than the pile"));
        }
        Ok(())
    }
}

/// Result of one accepted row action.
#[derive(Clone, Debug, PartialEq)]
pub struct RowStep {
    pub observation: Vec<CardValue>,
    pub reward: f64,
    pub done: bool,
}

/// Full state of the row game, hidden cards included.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowSnapshot {
    pub deck_values: Vec<CardValue>,
    pub deck_mask: Vec<bool>,
    pub drawn_card: CardValue,
    pub round: usize,
    pub done: bool,
    pub pile: Vec<CardValue>,
    pub cursor: usize,
}

pub struct RowGame {
    config: RowConfig,
    hidden_card_value: f64,
    pile: Pile,
    deck: PlayerDeck,
    round: usize,
    done: bool,
    rng: StdRng,
}

impl RowGame {
    pub fn new(config: RowConfig) -> Result<Self, GameError> {
        Self::with_prefix(config, &[])
    }

    /// Starts with `prefix` fixed at the front of the pile: the first `grid_len`
    /// cards form the row, the next one is the first drawn card.
    pub fn with_prefix(config: RowConfig, prefix: &[CardValue]) -> Result<Self, GameError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let (pile, deck) = Self::deal(&config, prefix, &mut rng)?;
        Ok(Self {
            config,
            hidden_card_value: mean_card_value(STANDARD_CARD_COUNT),
            pile,
            deck,
            round: 0,
            done: false,
            rng,
        })
    }

    fn deal(
        config: &RowConfig,
        prefix: &[CardValue],
        rng: &mut StdRng,
    ) -> Result<(Pile, PlayerDeck), GameError> {
        let cards = Pile::shuffled(STANDARD_CARD_COUNT, prefix, rng)?;
        let pile = Pile::new(cards, config.grid_len)?;
        let deck = PlayerDeck::new(1, config.grid_len, pile.dealt(), config.initial_visible);
        Ok((pile, deck))
    }

    /// Starts over, optionally with a fixed pile prefix and a new initial visible
    /// count. A rejected argument leaves the game untouched.
    pub fn reset(
        &mut self,
        prefix: Option<&[CardValue]>,
        initial_visible: Option<usize>,
    ) -> Result<Vec<CardValue>, GameError> {
        let mut config = self.config;
        if let Some(count) = initial_visible {
            config.initial_visible = count;
        }
        config.validate()?;
        let (pile, deck) = Self::deal(&config, prefix.unwrap_or_default(), &mut self.rng)?;
        self.config = config;
        self.pile = pile;
        self.deck = deck;
        self.round = 0;
        self.done = false;
        Ok(self.observation())
    }

    pub fn config(&self) -> RowConfig {
        self.config
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn drawn_card(&self) -> CardValue {
        self.pile.peek()
    }

    pub fn deck(&self) -> &PlayerDeck {
        &self.deck
    }

    pub fn expected_sum(&self) -> f64 {
        self.deck.expected_sum(self.hidden_card_value)
    }

    pub fn legal_actions(&self) -> Vec<usize> {
        (0..=self.config.grid_len).collect()
    }

    /// Cell indices ordered by masked value. Ties keep their left-to-right order.
    pub fn sorted_order(&self) -> Vec<usize> {
        let masked = self.deck.masked_values();
        let mut order: Vec<usize> = (0..masked.len()).collect();
        order.sort_by_key(|&idx| masked[idx]);
        order
    }

    /// Cell replaced by action `action`, or `None` for the discard action 0.
    pub fn target_cell(&self, action: usize) -> Result<Option<usize>, InvalidAction> {
        if action > self.config.grid_len {
            return Err(InvalidAction::ActionIndex(action));
        }
        if action == 0 {
            return Ok(None);
        }
        Ok(Some(self.sorted_order()[action - 1]))
    }

    /// Sorted masked row followed by the drawn card.
    pub fn observation(&self) -> Vec<CardValue> {
        let mut cards = self.deck.masked_values();
        cards.sort_unstable();
        cards.push(self.pile.peek());
        cards
    }

    pub fn snapshot(&self) -> RowSnapshot {
        RowSnapshot {
            deck_values: self.deck.values().to_vec(),
            deck_mask: self.deck.mask().to_vec(),
            drawn_card: self.pile.peek(),
            round: self.round,
            done: self.done,
            pile: self.pile.cards().to_vec(),
            cursor: self.pile.cursor(),
        }
    }

    pub fn step(&mut self, action: usize) -> Result<RowStep, GameError> {
        if self.done {
            return Err(GameError::GameOver);
        }
        let target = self.target_cell(action)?;
        let before = self.expected_sum();

        match target {
            None => {
                let hidden = self.deck.mask().iter().position(|&visible| !visible);
                if let Some(col) = hidden {
                    self.deck.reveal(0, col)?;
                }
            }
            Some(col) => {
                let replaced = self.deck.get_value(0, col)?;
                let drawn = self.pile.swap(replaced);
                self.deck.set_value(0, col, drawn)?;
                self.deck.reveal(0, col)?;
            }
        }
        self.pile.advance(&mut self.rng);
        self.round += 1;

        if self.deck.maybe_clear_row(0) {
            debug!("row cleared");
        }

        let after = self.expected_sum();
        let mut reward = step_reward(before, after);
        if self.config.round_penalty {
            reward -= 1.0 / self.config.max_rounds as f64;
        }
        if (after <= 0.0 && self.deck.is_fully_visible()) || self.round >= self.config.max_rounds {
            self.done = true;
            reward = -after;
            debug!(round = self.round, total = after, "row game over");
        }
        trace!(action, ?target, reward, done = self.done, "row step");

        Ok(RowStep {
            observation: self.observation(),
            reward,
            done: self.done,
        })
    }
}
