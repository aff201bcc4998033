use core::fmt;
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, EnumString};

use crate::error::{Result, UnoError};

/// Identity of one physical card, unique across every deck of a game.
pub type CardId = u64;

const WILD_SORT_WEIGHT: u32 = 1_000_000;

#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    EnumString,
    EnumCountMacro,
    EnumIter,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum CardColor {
    #[strum(to_string = "Red", serialize = "r")]
    Red,
    #[strum(to_string = "Green", serialize = "g")]
    Green,
    #[strum(to_string = "Blue", serialize = "b")]
    Blue,
    #[strum(to_string = "Yellow", serialize = "y")]
    Yellow,
}

impl CardColor {
    pub fn parse(token: &str) -> Result<Self> {
        token
            .trim()
            .parse()
            .map_err(|_| UnoError::InvalidColor(token.to_string()))
    }

    fn sort_weight(self) -> u32 {
        match self {
            CardColor::Red => 100_000,
            CardColor::Yellow => 10_000,
            CardColor::Green => 1_000,
            CardColor::Blue => 100,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl Rank {
    pub fn number(number: u8) -> Result<Self> {
        if number <= 9 {
            Ok(Rank::Number(number))
        } else {
            Err(UnoError::InvalidRank(number.to_string()))
        }
    }

    pub fn is_wild(self) -> bool {
        matches!(self, Rank::Wild | Rank::WildDrawFour)
    }

    /// Ranks with a side effect beyond matching.
    pub fn is_special(self) -> bool {
        !matches!(self, Rank::Number(_))
    }

    fn sort_weight(self) -> u32 {
        match self {
            Rank::Number(number) => number.into(),
            Rank::Skip => 10,
            Rank::Reverse => 11,
            Rank::DrawTwo => 12,
            Rank::Wild => 13,
            Rank::WildDrawFour => 14,
        }
    }
}

impl FromStr for Rank {
    type Err = UnoError;

    fn from_str(token: &str) -> Result<Self> {
        let normalized = token.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "S" | "SKIP" => Ok(Rank::Skip),
            "R" | "REV" | "REVERSE" | "NOU" => Ok(Rank::Reverse),
            "+2" | "D2" | "DRAW2" | "DRAW_TWO" => Ok(Rank::DrawTwo),
            "W" | "WILD" => Ok(Rank::Wild),
            "W+4" | "+4" | "WILD+4" | "WILD_DRAW_FOUR" => Ok(Rank::WildDrawFour),
            digits => match digits.parse::<u8>() {
                Ok(number) => Rank::number(number).map_err(|_| UnoError::InvalidRank(token.to_string())),
                Err(_) => Err(UnoError::InvalidRank(token.to_string())),
            },
        }
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Number(number) => write!(f, "{number}"),
            Rank::Skip => write!(f, "Skip"),
            Rank::Reverse => write!(f, "Reverse"),
            Rank::DrawTwo => write!(f, "+2"),
            Rank::Wild => write!(f, "Wild"),
            Rank::WildDrawFour => write!(f, "Wild+4"),
        }
    }
}

/// One physical card. Identity is the `id`; two cards with the same rank and
/// color are still different cards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    rank: Rank,
    color: Option<CardColor>,
}

impl Card {
    pub fn colored(id: CardId, color: CardColor, rank: Rank) -> Result<Self> {
        if rank.is_wild() || matches!(rank, Rank::Number(number) if number > 9) {
            return Err(UnoError::InvalidRank(rank.to_string()));
        }
        Ok(Self {
            id,
            rank,
            color: Some(color),
        })
    }

    pub fn wild(id: CardId, rank: Rank) -> Result<Self> {
        if !rank.is_wild() {
            return Err(UnoError::InvalidRank(rank.to_string()));
        }
        Ok(Self {
            id,
            rank,
            color: None,
        })
    }

    /// Builds a card from user tokens. The color token is ignored for wild
    /// ranks and required otherwise.
    pub fn parse(id: CardId, rank_token: &str, color_token: Option<&str>) -> Result<Self> {
        let rank: Rank = rank_token.parse()?;
        if rank.is_wild() {
            return Card::wild(id, rank);
        }
        let color = CardColor::parse(color_token.unwrap_or_default())?;
        Card::colored(id, color, rank)
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn color(&self) -> Option<CardColor> {
        self.color
    }

    pub fn is_wild(&self) -> bool {
        self.rank.is_wild()
    }

    pub fn color_name(&self) -> &'static str {
        match self.color {
            Some(CardColor::Red) => "Red",
            Some(CardColor::Green) => "Green",
            Some(CardColor::Blue) => "Blue",
            Some(CardColor::Yellow) => "Yellow",
            None => "Wild",
        }
    }

    /// Display ordering key. Equal for cards of the same rank and color,
    /// wild cards sort after every colored card.
    pub fn sort_key(&self) -> u32 {
        let color_weight = if self.is_wild() {
            WILD_SORT_WEIGHT
        } else {
            self.color.map_or(WILD_SORT_WEIGHT, CardColor::sort_weight)
        };
        color_weight + self.rank.sort_weight()
    }

    /// Same rank and color, regardless of identity.
    pub fn same_value(&self, other: &Card) -> bool {
        self.rank == other.rank && self.color == other.color
    }

    pub fn playable_on(&self, top: &Card) -> bool {
        self.is_wild() || top.color.is_none() || self.color == top.color || self.rank == top.rank
    }

    pub fn resolve_color(&mut self, color: CardColor) -> Result<()> {
        if !self.is_wild() {
            return Err(UnoError::NotWild(self.clone()));
        }
        if self.color.is_some() {
            return Err(UnoError::ColorAlreadyChosen(self.clone()));
        }
        self.color = Some(color);
        Ok(())
    }

    /// Card leaves play (recycled into the deck): a wild forgets its color.
    pub(crate) fn recycle(mut self) -> Self {
        if self.is_wild() {
            self.color = None;
        }
        self
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Card {}

impl Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_wild(), self.color) {
            (true, Some(color)) => write!(f, "{} ({color})", self.rank),
            (true, None) => write!(f, "{}", self.rank),
            (false, _) => write!(f, "{} {}", self.color_name(), self.rank),
        }
    }
}
