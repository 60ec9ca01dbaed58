use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::action::{Action, DrawChoice, PlacementChoice, PlayerId};
use crate::card::{
    CardValue, DEFAULT_COLS, DEFAULT_INITIAL_VISIBLE, DEFAULT_PLAYERS, DEFAULT_ROWS,
    STANDARD_CARD_COUNT, mean_card_value,
};
use crate::deck::PlayerDeck;
use crate::error::{GameError, InvalidAction};
use crate::pile::Pile;
use crate::score::{GreedyDelta, RoundResult, TerminalScoring, step_reward};
use crate::state::{GameSettings, GameSnapshot, Observation, Turn, TurnPhase};

pub(crate) const DEFAULT_SEED: u64 = 0x5EED_5EED_5EED_5EED;

/// Configuration required to bootstrap a game instance.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    pub num_players: usize,
    pub n_cards: usize,
    pub rows: usize,
    pub cols: usize,
    pub initial_visible: usize,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: DEFAULT_PLAYERS,
            n_cards: STANDARD_CARD_COUNT,
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            initial_visible: DEFAULT_INITIAL_VISIBLE,
            seed: DEFAULT_SEED,
        }
    }
}

impl GameConfig {
    pub fn new(num_players: usize, seed: u64) -> Result<Self, GameError> {
        let config = Self {
            num_players,
            seed,
            ..Self::default()
        };
        config.settings()?;
        Ok(config)
    }

    /// Validates the configuration and derives the game constants.
    pub fn settings(&self) -> Result<GameSettings, GameError> {
        if self.num_players == 0 {
            return Err(GameError::InvalidConfiguration("at least one player is required"));
        }
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::InvalidConfiguration("deck grid must not be empty"));
        }
        let cells = self.rows * self.cols;
        if self.initial_visible > cells {
            return Err(GameError::InvalidConfiguration(
                "initial visible cells exceed the deck size",
            ));
        }
        if self.n_cards <= self.num_players * cells {
            return Err(GameError::InvalidConfiguration(
                "pile does not contain enough cards to deal every deck",
            ));
        }
        Ok(GameSettings {
            num_players: self.num_players,
            n_cards: self.n_cards,
            rows: self.rows,
            cols: self.cols,
            initial_visible: self.initial_visible,
            hidden_card_value: mean_card_value(self.n_cards),
        })
    }
}

/// Builder that enables deterministic pile injection for testing and RL experiments.
pub struct GameBuilder {
    config: GameConfig,
    pile_prefix: Vec<CardValue>,
    terminal_scoring: Box<dyn TerminalScoring>,
}

impl GameBuilder {
    pub fn new(num_players: usize) -> Result<Self, GameError> {
        Ok(Self::from_config(GameConfig::new(num_players, DEFAULT_SEED)?))
    }

    pub fn from_config(config: GameConfig) -> Self {
        Self {
            config,
            pile_prefix: Vec::new(),
            terminal_scoring: Box::new(GreedyDelta),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Fix the first cards of the pile; the rest of the distribution is shuffled behind them.
    /// Decks are dealt from the front, `rows * cols` cards per player in seat order.
    pub fn with_pile_prefix(mut self, prefix: Vec<CardValue>) -> Self {
        self.pile_prefix = prefix;
        self
    }

    pub fn with_initial_visible(mut self, initial_visible: usize) -> Self {
        self.config.initial_visible = initial_visible;
        self
    }

    pub fn with_grid(mut self, rows: usize, cols: usize) -> Self {
        self.config.rows = rows;
        self.config.cols = cols;
        self
    }

    pub fn with_cards(mut self, n_cards: usize) -> Self {
        self.config.n_cards = n_cards;
        self
    }

    pub fn with_terminal_scoring<T: TerminalScoring + 'static>(mut self, scoring: T) -> Self {
        self.terminal_scoring = Box::new(scoring);
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

/// Result of one accepted action.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    /// Observation for the player who acts next.
    pub observation: Observation,
    /// Reward for the player who just acted.
    pub reward: f64,
    pub done: bool,
}

/// Core Skyjo round engine.
pub struct Game {
    settings: GameSettings,
    pile_prefix: Vec<CardValue>,
    pile: Pile,
    decks: Vec<PlayerDeck>,
    turn: Turn,
    last_player: Option<PlayerId>,
    done: bool,
    latest_action: Option<Action>,
    round_result: Option<RoundResult>,
    terminal_scoring: Box<dyn TerminalScoring>,
    rng: StdRng,
}

impl Game {
    pub fn builder(num_players: usize) -> Result<GameBuilder, GameError> {
        GameBuilder::new(num_players)
    }

    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        GameBuilder::from_config(config).build()
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder {
            config,
            pile_prefix,
            terminal_scoring,
        } = builder;
        let settings = config.settings()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let (pile, decks) = Self::deal(&settings, &pile_prefix, &mut rng)?;
        Ok(Game {
            settings,
            pile_prefix,
            pile,
            decks,
            turn: Turn::start(),
            last_player: None,
            done: false,
            latest_action: None,
            round_result: None,
            terminal_scoring,
            rng,
        })
    }

    fn deal(
        settings: &GameSettings,
        prefix: &[CardValue],
        rng: &mut StdRng,
    ) -> Result<(Pile, Vec<PlayerDeck>), GameError> {
        let cells = settings.cells_per_deck();
        let cards = Pile::shuffled(settings.n_cards, prefix, rng)?;
        let pile = Pile::new(cards, settings.num_players * cells)?;
        let decks = pile
            .dealt()
            .chunks(cells)
            .map(|values| {
                PlayerDeck::new(settings.rows, settings.cols, values, settings.initial_visible)
            })
            .collect();
        Ok((pile, decks))
    }

    /// Starts a new round with a fresh permutation drawn from the game's generator.
    pub fn reset(&mut self) -> Result<Observation, GameError> {
        let (pile, decks) = Self::deal(&self.settings, &self.pile_prefix, &mut self.rng)?;
        self.pile = pile;
        self.decks = decks;
        self.turn = Turn::start();
        self.last_player = None;
        self.done = false;
        self.latest_action = None;
        self.round_result = None;
        debug!(players = self.settings.num_players, "round reset");
        Ok(self.current_observation())
    }

    /// Reseeds the generator, then resets.
    pub fn reset_with_seed(&mut self, seed: u64) -> Result<Observation, GameError> {
        self.rng = StdRng::seed_from_u64(seed);
        self.reset()
    }

    /// Replaces the fixed pile prefix, then resets. A rejected prefix leaves the game untouched.
    pub fn reset_with_prefix(&mut self, prefix: Vec<CardValue>) -> Result<Observation, GameError> {
        let previous = std::mem::replace(&mut self.pile_prefix, prefix);
        self.reset().inspect_err(|_| self.pile_prefix = previous)
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn current_player(&self) -> PlayerId {
        self.turn.player
    }

    pub fn phase(&self) -> TurnPhase {
        self.turn.phase
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn last_player(&self) -> Option<PlayerId> {
        self.last_player
    }

    pub fn latest_action(&self) -> Option<Action> {
        self.latest_action
    }

    /// Totals of the round once it has ended.
    pub fn round_result(&self) -> Option<&RoundResult> {
        self.round_result.as_ref()
    }

    pub fn pile(&self) -> &Pile {
        &self.pile
    }

    pub fn deck(&self, player: PlayerId) -> Result<&PlayerDeck, GameError> {
        self.decks.get(player).ok_or(GameError::InvalidPlayer(player))
    }

    pub fn expected_sum(&self, player: PlayerId) -> Result<f64, GameError> {
        Ok(self.deck(player)?.expected_sum(self.settings.hidden_card_value))
    }

    pub fn observation(&self, player: PlayerId) -> Result<Observation, GameError> {
        let deck = self.deck(player)?;
        Ok(Observation {
            player,
            deck_values: deck.masked_grid(),
            deck_mask: deck.mask_grid(),
            visible_card: self.pile.peek(),
            turn: self.turn,
        })
    }

    /// Observation for the player who has to act.
    pub fn current_observation(&self) -> Observation {
        let deck = &self.decks[self.turn.player];
        Observation {
            player: self.turn.player,
            deck_values: deck.masked_grid(),
            deck_mask: deck.mask_grid(),
            visible_card: self.pile.peek(),
            turn: self.turn,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            pile: self.pile.cards().to_vec(),
            cursor: self.pile.cursor(),
            decks: self.decks.clone(),
            turn: self.turn,
            last_player: self.last_player,
            done: self.done,
            latest_action: self.latest_action,
        }
    }

    /// Actions legal in `phase` for a deck: both draw choices, or for every cell a
    /// replacement plus a discard-and-flip when the cell is still face down.
    pub fn legal_actions_for(phase: TurnPhase, deck: &PlayerDeck) -> Vec<Action> {
        match phase {
            TurnPhase::NeedsDraw => vec![
                Action::Draw(DrawChoice::DrawFresh),
                Action::Draw(DrawChoice::TakeVisible),
            ],
            TurnPhase::NeedsPlacement => {
                let mut actions = Vec::with_capacity(deck.rows() * deck.cols() * 2);
                for row in 0..deck.rows() {
                    for col in 0..deck.cols() {
                        actions.push(Action::replace(row, col));
                        if deck.is_visible(row, col) == Ok(false) {
                            actions.push(Action::flip(row, col));
                        }
                    }
                }
                actions
            }
        }
    }

    pub fn legal_actions(&self, player: PlayerId) -> Result<Vec<Action>, GameError> {
        if self.done {
            return Ok(Vec::new());
        }
        self.check_turn(player)?;
        Ok(Self::legal_actions_for(
            self.turn.phase,
            &self.decks[player],
        ))
    }

    /// Applies `action` for `player`. Nothing changes when an error is returned.
    pub fn step(&mut self, player: PlayerId, action: Action) -> Result<StepOutcome, GameError> {
        if self.done {
            return Err(GameError::GameOver);
        }
        self.check_turn(player)?;
        Self::check_action(self.turn.phase, &self.decks[player], action)?;

        let phase = self.turn.phase;
        let reward = match action {
            Action::Draw(choice) => {
                if choice == DrawChoice::DrawFresh {
                    self.pile.advance(&mut self.rng);
                }
                self.turn.phase = TurnPhase::NeedsPlacement;
                0.0
            }
            Action::Place { choice, row, col } => self.place(choice, row, col)?,
        };
        self.latest_action = Some(action);
        trace!(player, ?phase, ?action, reward, done = self.done, "step");

        Ok(StepOutcome {
            observation: self.current_observation(),
            reward,
            done: self.done,
        })
    }

    /// Convenience for drivers speaking the `[draw, placement, row, col]` encoding.
    pub fn step_tuple(&mut self, player: PlayerId, tuple: [i32; 4]) -> Result<StepOutcome, GameError> {
        let action = Action::from_tuple(tuple)?;
        self.step(player, action)
    }

    fn check_turn(&self, player: PlayerId) -> Result<(), GameError> {
        if player >= self.settings.num_players {
            return Err(GameError::InvalidPlayer(player));
        }
        if player != self.turn.player {
            return Err(GameError::NotPlayersTurn {
                expected: self.turn.player,
                actual: player,
            });
        }
        Ok(())
    }

    fn check_action(phase: TurnPhase, deck: &PlayerDeck, action: Action) -> Result<(), InvalidAction> {
        match (phase, action) {
            (TurnPhase::NeedsDraw, Action::Draw(_)) => Ok(()),
            (TurnPhase::NeedsPlacement, Action::Place { choice, row, col }) => {
                let visible = deck.is_visible(row, col)?;
                if choice == PlacementChoice::DiscardAndFlip && visible {
                    return Err(InvalidAction::CellAlreadyVisible { row, col });
                }
                Ok(())
            }
            (phase, _) => Err(InvalidAction::WrongPhase { phase }),
        }
    }

    fn place(&mut self, choice: PlacementChoice, row: usize, col: usize) -> Result<f64, GameError> {
        let player = self.turn.player;
        let num_players = self.settings.num_players;
        let hidden_value = self.settings.hidden_card_value;
        let deck = &mut self.decks[player];
        let before = deck.expected_sum(hidden_value);

        match choice {
            PlacementChoice::ReplaceCell => {
                let replaced = deck.get_value(row, col)?;
                let drawn = self.pile.swap(replaced);
                deck.set_value(row, col, drawn)?;
                deck.reveal(row, col)?;
            }
            PlacementChoice::DiscardAndFlip => deck.reveal(row, col)?,
        }
        if deck.maybe_clear_column(col) {
            debug!(player, col, "column cleared");
        }

        let mut reward = step_reward(before, deck.expected_sum(hidden_value));
        if deck.is_fully_visible() && self.last_player.is_none() {
            let last = (player + num_players - 1) % num_players;
            self.last_player = Some(last);
            debug!(player, last_player = last, "deck fully revealed, final lap");
        }
        if self.last_player == Some(player) {
            self.done = true;
            let round = self.summarize(player);
            reward = self.terminal_scoring.terminal_reward(reward, &round);
            debug!(player, face_totals = ?round.face_totals, "round over");
            self.round_result = Some(round);
        }

        self.turn = Turn {
            player: (player + 1) % num_players,
            phase: TurnPhase::NeedsDraw,
        };
        Ok(reward)
    }

    fn summarize(&self, acting_player: PlayerId) -> RoundResult {
        let hidden_value = self.settings.hidden_card_value;
        RoundResult {
            acting_player,
            expected_totals: self
                .decks
                .iter()
                .map(|deck| deck.expected_sum(hidden_value))
                .collect(),
            face_totals: self.decks.iter().map(PlayerDeck::face_total).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_the_boxed_game() -> Result<(), GameError> {
        let settings = GameConfig::default().settings()?;
        assert_eq!(settings.num_players, 4);
        assert_eq!(settings.cells_per_deck(), 12);
        assert!((settings.hidden_card_value - 760.0 / 150.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn config_validation() {
        let too_many = GameConfig {
            num_players: 13,
            ..GameConfig::default()
        };
        assert!(too_many.settings().is_err());
        let over_revealed = GameConfig {
            initial_visible: 13,
            ..GameConfig::default()
        };
        assert!(over_revealed.settings().is_err());
        assert!(GameConfig::new(0, 1).is_err());
    }

    #[test]
    fn check_action_agrees_with_catalog() -> Result<(), GameError> {
        let game = Game::builder(2)?.with_initial_visible(5).build()?;
        let deck = game.deck(0)?;
        let mut candidates = vec![
            Action::Draw(DrawChoice::DrawFresh),
            Action::Draw(DrawChoice::TakeVisible),
        ];
        for row in 0..3 {
            for col in 0..4 {
                candidates.push(Action::replace(row, col));
                candidates.push(Action::flip(row, col));
            }
        }
        for phase in [TurnPhase::NeedsDraw, TurnPhase::NeedsPlacement] {
            let legal = Game::legal_actions_for(phase, deck);
            for action in &candidates {
                assert_eq!(
                    Game::check_action(phase, deck, *action).is_ok(),
                    legal.contains(action),
                    "{phase:?} {action:?}"
                );
            }
        }
        Ok(())
    }

    #[test]
    fn config_round_trips_through_json() -> Result<(), Box<dyn std::error::Error>> {
        let config: GameConfig = serde_json::from_str(r#"{"num_players": 2, "seed": 9}"#)?;
        assert_eq!(config.num_players, 2);
        assert_eq!(config.rows, DEFAULT_ROWS);
        assert_eq!(config.seed, 9);
        Ok(())
    }
}
