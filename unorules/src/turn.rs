use core::fmt;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::card::{Card, CardColor, Rank};
use crate::player::PlayerId;

/// Normalized `(rank, color)` tokens naming a card in the current hand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSelector {
    pub rank: String,
    pub color: Option<String>,
}

impl CardSelector {
    pub fn new(rank: impl Into<String>, color: Option<impl Into<String>>) -> Self {
        Self {
            rank: rank.into(),
            color: color.map(Into::into),
        }
    }

    pub fn colored(color: impl Into<String>, rank: impl Into<String>) -> Self {
        Self::new(rank, Some(color))
    }

    pub fn wild(rank: impl Into<String>) -> Self {
        Self::new(rank, None::<String>)
    }

    /// Selector naming a card's own value.
    pub fn for_card(card: &Card) -> Self {
        if card.is_wild() {
            Self::wild(card.rank().to_string())
        } else {
            Self::new(card.rank().to_string(), card.color().map(|color| color.to_string()))
        }
    }

    /// Reads `"<color> <rank>"`, `"<rank> <color>"` or a lone rank such as
    /// `"w+4"`. A lone color names nothing.
    pub fn parse(input: &str) -> Option<Self> {
        let words = input.split_whitespace().collect::<Vec<_>>();
        let is_color = |word: &str| CardColor::parse(word).is_ok();

        match words.as_slice() {
            [] => None,
            [word] if is_color(*word) => None,
            [word] => Some(Self::wild(*word)),
            [first, second, ..] if is_color(*first) => Some(Self::colored(*first, *second)),
            [first, second, ..] if is_color(*second) => Some(Self::colored(*second, *first)),
            [first, ..] => Some(Self::wild(*first)),
        }
    }

    pub(crate) fn resolve_rank(&self) -> Option<Rank> {
        self.rank.parse().ok()
    }

    pub(crate) fn resolve_color(&self) -> Option<CardColor> {
        self.color
            .as_deref()
            .and_then(|color| CardColor::parse(color).ok())
    }
}

impl Display for CardSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.color {
            Some(color) => write!(f, "{color} {}", self.rank),
            None => write!(f, "{}", self.rank),
        }
    }
}

/// Side effect of a played card on the rest of the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Neutral,
    Reversed,
    Skipped(PlayerId),
    Drew {
        player: PlayerId,
        count: usize,
        skipped: bool,
    },
    ColorChosen(Option<CardColor>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayOutcome {
    pub player: PlayerId,
    pub card: Card,
    pub effect: Effect,
    pub finished_rank: Option<usize>,
    pub game_over: bool,
    pub next_player: Option<PlayerId>,
    pub narrative: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOutcome {
    pub player: PlayerId,
    pub card: Option<Card>,
    pub next_player: Option<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalloutOutcome {
    pub caller: PlayerId,
    /// Players who picked up cards and how many they got.
    pub penalized: Vec<(PlayerId, usize)>,
    pub false_callout: bool,
    pub narrative: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_color_first_or_second() {
        assert_eq!(
            CardSelector::parse("r 5"),
            Some(CardSelector::colored("r", "5"))
        );
        assert_eq!(
            CardSelector::parse("skip blue"),
            Some(CardSelector::colored("blue", "skip"))
        );
    }

    #[test]
    fn parse_accepts_lone_rank() {
        assert_eq!(CardSelector::parse("w+4"), Some(CardSelector::wild("w+4")));
        assert_eq!(CardSelector::parse("  wild  "), Some(CardSelector::wild("wild")));
    }

    #[test]
    fn parse_rejects_lone_color_and_empty_input() {
        assert_eq!(CardSelector::parse("red"), None);
        assert_eq!(CardSelector::parse("   "), None);
    }

    #[test]
    fn selector_for_card_round_trips_tokens() {
        let card = Card::colored(1, CardColor::Green, Rank::DrawTwo).unwrap();
        let selector = CardSelector::for_card(&card);

        assert_eq!(selector.resolve_rank(), Some(Rank::DrawTwo));
        assert_eq!(selector.resolve_color(), Some(CardColor::Green));

        let wild = Card::wild(2, Rank::WildDrawFour).unwrap();
        assert_eq!(
            CardSelector::for_card(&wild).resolve_rank(),
            Some(Rank::WildDrawFour)
        );
    }
}
