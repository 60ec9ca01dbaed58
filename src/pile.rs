//! Single-array draw and discard pile.
//!
//! The slot under the cursor is the card currently on offer. Replacing a deck
//! card writes the replaced card back into that slot, so the same array is the
//! draw pile, the discard pile and the history. Only the region after the
//! initial deal is ever reshuffled.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::card::{CardValue, card_counts, in_domain, pile_from_counts, take_from_counts};
use crate::error::GameError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pile {
    cards: Vec<CardValue>,
    cursor: usize,
    deal_end: usize,
}

impl Pile {
    /// Shuffled pile of `n_cards` with `prefix` fixed at the front.
    ///
    /// The prefix consumes copies from the distribution; only the remaining
    /// cards are shuffled behind it.
    pub fn shuffled<R: Rng + ?Sized>(
        n_cards: usize,
        prefix: &[CardValue],
        rng: &mut R,
    ) -> Result<Vec<CardValue>, GameError> {
        let mut counts = card_counts(n_cards);
        for &value in prefix {
            if !in_domain(value) {
                return Err(GameError::InvalidConfiguration(
                    "pile prefix contains a value outside [-2, 12]",
                ));
            }
            if !take_from_counts(&mut counts, value) {
                return Err(GameError::InvalidConfiguration(
                    "pile prefix uses more copies of a value than the pile holds",
                ));
            }
        }
        let mut rest = pile_from_counts(&counts);
        rest.shuffle(rng);
        let mut cards = Vec::with_capacity(n_cards);
        cards.extend_from_slice(prefix);
        cards.append(&mut rest);
        Ok(cards)
    }

    /// Wraps a dealt pile. `deal_end` is the index just past the dealt cards and
    /// becomes both the starting cursor and the reshuffle restart point.
    pub fn new(cards: Vec<CardValue>, deal_end: usize) -> Result<Self, GameError> {
        if deal_end >= cards.len() {
            return Err(GameError::InvalidConfiguration(
                "pile must hold at least one card beyond the initial deal",
            ));
        }
        Ok(Self {
            cards,
            cursor: deal_end,
            deal_end,
        })
    }

    /// Card currently on offer.
    pub fn peek(&self) -> CardValue {
        self.cards[self.cursor]
    }

    /// Exposes the next card; the one on offer is passed over. Running off the
    /// end reshuffles, so the cursor always points at a card afterwards.
    /// Returns whether a reshuffle happened.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.cursor += 1;
        self.reshuffle_if_exhausted(rng)
    }

    /// Writes a discarded deck card into the slot on offer.
    pub fn swap(&mut self, replaced: CardValue) -> CardValue {
        std::mem::replace(&mut self.cards[self.cursor], replaced)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.cards.len()
    }

    /// Restarts the cursor just after the deal and permutes the tail when the
    /// cursor has run off the end. Returns whether a reshuffle happened.
    pub fn reshuffle_if_exhausted<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if !self.is_exhausted() {
            return false;
        }
        self.cursor = self.deal_end;
        self.cards[self.deal_end..].shuffle(rng);
        debug!(
            restart = self.deal_end,
            remaining = self.cards.len() - self.deal_end,
            "pile reshuffled"
        );
        true
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn deal_end(&self) -> usize {
        self.deal_end
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[CardValue] {
        &self.cards
    }

    /// Cards dealt before play started.
    pub(crate) fn dealt(&self) -> &[CardValue] {
        &self.cards[..self.deal_end]
    }
}
