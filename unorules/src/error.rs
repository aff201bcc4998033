use std::fmt::Debug;

use thiserror::Error;

use crate::card::Card;
use crate::player::PlayerId;
use crate::rules::RuleName;

#[derive(Error, Debug)]
pub enum UnoError {
    #[error("Need at least {required} players to start, found {found}")]
    InsufficientPlayers { required: usize, found: usize },
    #[error("Not enough cards to continue: needed {needed}, {available} available")]
    InsufficientCards { needed: usize, available: usize },
    #[error("Rule '{0}' not found")]
    RuleNotFound(String),
    #[error("Invalid value '{value}' for rule {rule}")]
    InvalidRuleValue { rule: RuleName, value: String },
    #[error("Value {value} for rule {rule} is outside {min}..={max}")]
    RuleOutOfRange {
        rule: RuleName,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("'{0}' is not a card rank")]
    InvalidRank(String),
    #[error("'{0}' is not a color")]
    InvalidColor(String),
    #[error("Card {0} not found in hand")]
    CardNotInHand(String),
    #[error("You cannot play {card} here. Last played card was {top}")]
    IllegalPlay { card: Card, top: Card },
    #[error("You must play a card if able. Last played card was {top}")]
    MustPlayAvailable { top: Card },
    #[error("You already said UNO!")]
    AlreadyCalled,
    #[error("You have {cards} cards, UNO can only be called with 2 or fewer")]
    NotEligible { cards: usize },
    #[error("Callouts are not permitted in this game")]
    CalloutsDisabled,
    #[error("A callout was already performed in this turn!")]
    AlreadyCalledOutThisTurn,
    #[error("Player {0} is not at the table")]
    PlayerNotFound(PlayerId),
    #[error("The game has not started yet")]
    GameNotStarted,
    #[error("The game has already started")]
    GameAlreadyStarted,
    #[error("The game has ended")]
    GameOver,
    #[error("{0} already has a color")]
    ColorAlreadyChosen(Card),
    #[error("{0} is not a wild card")]
    NotWild(Card),
    #[error("Snapshot failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl UnoError {
    /// Errors that abort game setup instead of rejecting a single command.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            UnoError::InsufficientPlayers { .. }
                | UnoError::InsufficientCards { .. }
                | UnoError::RuleNotFound(_)
                | UnoError::InvalidRuleValue { .. }
                | UnoError::RuleOutOfRange { .. }
        )
    }
}

pub type Result<T, E = UnoError> = std::result::Result<T, E>;
