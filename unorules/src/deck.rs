use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{
    card::{Card, CardColor, CardId, Rank},
    constants::*,
    error::Result,
    rng::GameRng,
    rules::RuleSet,
};

/// Draw pile. Cards are drawn from the end of the vector.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Deck(pub(crate) Vec<Card>);

impl Deck {
    /// Builds `deck_count` standard packs in order. `next_id` is advanced past
    /// every id handed out.
    pub fn build(rules: &RuleSet, next_id: &mut CardId) -> Result<Self> {
        let mut cards = Vec::with_capacity(CARDS_PER_DECK * rules.deck_count());
        let mut mint = || {
            let id = *next_id;
            *next_id += 1;
            id
        };

        for _ in 0..rules.deck_count() {
            for color in CardColor::iter() {
                // Number Cards
                for number in NUMBER_CARDS_PER_COLOR {
                    cards.push(Card::colored(mint(), color, Rank::number(*number)?)?);
                }

                // Skip Cards
                for _ in 0..SKIP_CARDS_PER_COLOR {
                    cards.push(Card::colored(mint(), color, Rank::Skip)?);
                }

                // Reverse Cards
                for _ in 0..REVERSE_CARDS_PER_COLOR {
                    cards.push(Card::colored(mint(), color, Rank::Reverse)?);
                }

                // Draw Two Cards
                for _ in 0..DRAW_TWO_CARDS_PER_COLOR {
                    cards.push(Card::colored(mint(), color, Rank::DrawTwo)?);
                }
            }

            for _ in 0..WILD_CARDS_IN_DECK {
                cards.push(Card::wild(mint(), Rank::Wild)?);
            }

            for _ in 0..WILD_DRAW_FOUR_CARDS_IN_DECK {
                cards.push(Card::wild(mint(), Rank::WildDrawFour)?);
            }
        }

        Ok(Self(cards))
    }

    pub(crate) fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.0);
    }

    pub(crate) fn draw(&mut self) -> Option<Card> {
        self.0.pop()
    }

    /// Returns recycled cards to the deck; callers shuffle afterwards.
    pub(crate) fn refill(&mut self, cards: Vec<Card>) {
        self.0.extend(cards.into_iter().map(Card::recycle));
    }

    pub fn cards(&self) -> &[Card] {
        &self.0
    }

    pub fn cards_count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Played cards; the last one is the active card.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DiscardPile(pub(crate) Vec<Card>);

impl DiscardPile {
    pub fn top(&self) -> Option<&Card> {
        self.0.last()
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut Card> {
        self.0.last_mut()
    }

    pub(crate) fn push(&mut self, card: Card) {
        self.0.push(card);
    }

    /// Removes every card except the active one.
    pub(crate) fn take_all_but_top(&mut self) -> Vec<Card> {
        let keep_from = self.0.len().saturating_sub(1);
        self.0.drain(..keep_from).collect()
    }

    pub fn cards_count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
