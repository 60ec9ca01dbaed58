use serde::{Deserialize, Serialize};

use crate::error::InvalidAction;

/// Zero-based index of a player within the game.
pub type PlayerId = usize;

/// Sentinel for the unused fields of an encoded action.
pub const UNUSED: i32 = -1;

/// Choice made while the turn needs a card to be drawn.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DrawChoice {
    /// Pass over the card on offer and expose the next one from the pile.
    DrawFresh,
    /// Keep the card currently on offer.
    TakeVisible,
}

/// Choice made once a card is in hand.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PlacementChoice {
    /// Throw the drawn card away and turn a face-down cell up.
    DiscardAndFlip,
    /// Put the drawn card into a cell; the replaced card goes onto the pile.
    ReplaceCell,
}

/// Action available to an agent during its turn.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Action {
    Draw(DrawChoice),
    Place {
        choice: PlacementChoice,
        row: usize,
        col: usize,
    },
}

impl Action {
    pub fn replace(row: usize, col: usize) -> Self {
        Action::Place {
            choice: PlacementChoice::ReplaceCell,
            row,
            col,
        }
    }

    pub fn flip(row: usize, col: usize) -> Self {
        Action::Place {
            choice: PlacementChoice::DiscardAndFlip,
            row,
            col,
        }
    }

    /// Encodes as `[draw_choice, placement_choice, row, col]`, unused fields set to `-1`.
    ///
    /// `draw_choice` is 0 for a fresh draw and 1 for taking the visible card;
    /// `placement_choice` is 0 for discard-and-flip and 1 for replacing a cell.
    pub fn to_tuple(self) -> [i32; 4] {
        match self {
            Action::Draw(DrawChoice::DrawFresh) => [0, UNUSED, UNUSED, UNUSED],
            Action::Draw(DrawChoice::TakeVisible) => [1, UNUSED, UNUSED, UNUSED],
            Action::Place { choice, row, col } => {
                let code = match choice {
                    PlacementChoice::DiscardAndFlip => 0,
                    PlacementChoice::ReplaceCell => 1,
                };
                [UNUSED, code, row as i32, col as i32]
            }
        }
    }

    pub fn from_tuple(tuple: [i32; 4]) -> Result<Self, InvalidAction> {
        let malformed = InvalidAction::MalformedTuple(tuple);
        match tuple {
            [0, UNUSED, UNUSED, UNUSED] => Ok(Action::Draw(DrawChoice::DrawFresh)),
            [1, UNUSED, UNUSED, UNUSED] => Ok(Action::Draw(DrawChoice::TakeVisible)),
            [UNUSED, code, row, col] if row >= 0 && col >= 0 => {
                let choice = match code {
                    0 => PlacementChoice::DiscardAndFlip,
                    1 => PlacementChoice::ReplaceCell,
                    _ => return Err(malformed),
                };
                Ok(Action::Place {
                    choice,
                    row: row as usize,
                    col: col as usize,
                })
            }
            _ => Err(malformed),
        }
    }
}
