use core::fmt;
use std::{fmt::Display, time::Duration};

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::player::PlayerId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub player: PlayerId,
    pub name: String,
    pub cards: usize,
}

/// What is on the table right now, in turn order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub top_card: Card,
    pub current_player: Option<PlayerId>,
    pub seats: Vec<Seat>,
    pub elapsed: Duration,
    pub cards_drawn: u64,
}

impl Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "A {} has been played!", self.top_card)?;
        let current = self
            .current_player
            .and_then(|id| self.seats.iter().find(|seat| seat.player == id));
        if let Some(seat) = current {
            writeln!(f, "It is currently {}'s turn!", seat.name)?;
        }
        writeln!(f)?;
        for (position, seat) in self.seats.iter().enumerate() {
            writeln!(f, "{}. {} - {} cards", position + 1, seat.name, seat.cards)?;
        }
        write!(
            f,
            "This game has lasted {} minutes and {} cards have been drawn",
            self.elapsed.as_secs() / 60,
            self.cards_drawn
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub rank: usize,
    pub player: PlayerId,
    pub name: String,
}

/// Finishing order so far, winner first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub standings: Vec<Standing>,
    pub elapsed: Duration,
    pub cards_drawn: u64,
}

impl Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for standing in &self.standings {
            writeln!(f, "{}. *{}*", standing.rank, standing.name)?;
        }
        write!(
            f,
            "\nThis game lasted {} minutes and {} cards were drawn",
            self.elapsed.as_secs() / 60,
            self.cards_drawn
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardColor, Rank};

    #[test]
    fn scoreboard_lists_ranks_and_totals() {
        let scoreboard = Scoreboard {
            standings: vec![
                Standing {
                    rank: 1,
                    player: 1,
                    name: "Bob".to_string(),
                },
                Standing {
                    rank: 2,
                    player: 0,
                    name: "Alice".to_string(),
                },
            ],
            elapsed: Duration::from_secs(185),
            cards_drawn: 31,
        };

        assert_eq!(
            scoreboard.to_string(),
            "1. *Bob*\n2. *Alice*\n\nThis game lasted 3 minutes and 31 cards were drawn"
        );
    }

    #[test]
    fn table_summary_names_current_player() {
        let summary = TableSummary {
            top_card: Card::colored(4, CardColor::Blue, Rank::Number(7)).unwrap(),
            current_player: Some(0),
            seats: vec![
                Seat {
                    player: 0,
                    name: "Alice".to_string(),
                    cards: 3,
                },
                Seat {
                    player: 1,
                    name: "Bob".to_string(),
                    cards: 1,
                },
            ],
            elapsed: Duration::from_secs(30),
            cards_drawn: 15,
        };

        assert_eq!(
            summary.to_string(),
            "A Blue 7 has been played!\nIt is currently Alice's turn!\n\n1. Alice - 3 cards\n2. Bob - 1 cards\nThis game has lasted 0 minutes and 15 cards have been drawn"
        );
    }
}
