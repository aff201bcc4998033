use serde::{Deserialize, Serialize};

use crate::card::{Card, CardId};
use crate::constants::UNO_HAND_SIZE;
use crate::error::{Result, UnoError};
use crate::turn::CardSelector;

pub type PlayerId = u64;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    name: String,
    is_ai: bool,
    pub hand: Vec<Card>,
    pub uno_called: bool,
    finished: bool,
    rank: Option<usize>,
}

impl Player {
    pub fn new(id: PlayerId, name: String, is_ai: bool) -> Self {
        Self {
            id,
            name,
            is_ai,
            hand: Vec::new(),
            uno_called: false,
            finished: false,
            rank: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_ai(&self) -> bool {
        self.is_ai
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Finishing position, 1 for the winner.
    pub fn rank(&self) -> Option<usize> {
        self.rank
    }

    pub fn cards_count(&self) -> usize {
        self.hand.len()
    }

    /// First card in hand matching the selector. Wild ranks match on rank
    /// alone, every other rank needs the color too.
    pub fn get_card(&self, selector: &CardSelector) -> Option<&Card> {
        let rank = selector.resolve_rank()?;
        if rank.is_wild() {
            return self.hand.iter().find(|card| card.rank() == rank);
        }

        let color = selector.resolve_color()?;
        self.hand
            .iter()
            .find(|card| card.rank() == rank && card.color() == Some(color))
    }

    pub fn has_playable_card(&self, top: &Card) -> bool {
        self.hand.iter().any(|card| card.playable_on(top))
    }

    pub fn sort_hand(&mut self) {
        self.hand.sort_by_key(|card| (card.sort_key(), card.id()));
    }

    pub fn hand_summary(&self) -> String {
        self.hand
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub(crate) fn add_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.hand.extend(cards);
        self.uno_called = false;
        self.sort_hand();
    }

    /// Removes exactly the card with this id, never other copies of it.
    pub(crate) fn remove_card(&mut self, id: CardId) -> Option<Card> {
        let index = self.hand.iter().position(|card| card.id() == id)?;
        Some(self.hand.remove(index))
    }

    pub(crate) fn uno(&mut self) -> Result<()> {
        if self.hand.len() > UNO_HAND_SIZE {
            return Err(UnoError::NotEligible {
                cards: self.hand.len(),
            });
        }
        if self.uno_called {
            return Err(UnoError::AlreadyCalled);
        }
        self.uno_called = true;
        Ok(())
    }

    pub(crate) fn finish(&mut self, rank: usize) {
        self.finished = true;
        self.rank = Some(rank);
    }
}
