//! Move selection for computer-controlled seats.
//!
//! Policies only look at the game; [`take_turn`] carries a chosen plan out
//! through the regular engine commands.

use std::collections::HashSet;

use tracing::debug;

use crate::card::{Card, CardColor, Rank};
use crate::engine::GameEngine;
use crate::error::{Result, UnoError};
use crate::player::{Player, PlayerId};
use crate::turn::{CardSelector, DrawOutcome, PlayOutcome};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Move {
    Play {
        selector: CardSelector,
        color: Option<CardColor>,
    },
    Draw,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnPlan {
    /// Call UNO before acting.
    pub call_uno: bool,
    pub action: Move,
}

pub trait MovePolicy {
    fn select_move(&self, engine: &GameEngine, player_id: PlayerId) -> Result<TurnPlan>;
}

/// Dumps attacking cards first, keeps numbers it holds in several colors for
/// last, and names the color it holds most when playing a wild.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    fn best_color(hand: &[Card]) -> CardColor {
        let mut counts: Vec<(CardColor, usize)> = Vec::new();
        for color in hand.iter().filter(|card| !card.is_wild()).filter_map(Card::color) {
            match counts.iter_mut().find(|(seen, _)| *seen == color) {
                Some((_, count)) => *count += 1,
                None => counts.push((color, 1)),
            }
        }

        counts
            .into_iter()
            .fold(None, |best: Option<(CardColor, usize)>, (color, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((color, count)),
            })
            .map_or(CardColor::Red, |(color, _)| color)
    }

    /// Ranks held in more than one color.
    fn held_back(hand: &[Card]) -> HashSet<Rank> {
        let mut colors_by_rank: Vec<(Rank, HashSet<CardColor>)> = Vec::new();
        for card in hand.iter().filter(|card| !card.is_wild()) {
            let Some(color) = card.color() else {
                continue;
            };
            match colors_by_rank.iter_mut().find(|(rank, _)| *rank == card.rank()) {
                Some((_, colors)) => {
                    colors.insert(color);
                }
                None => colors_by_rank.push((card.rank(), HashSet::from([color]))),
            }
        }

        colors_by_rank
            .into_iter()
            .filter(|(_, colors)| colors.len() > 1)
            .map(|(rank, _)| rank)
            .collect()
    }

    fn play(card: &Card, hand: &[Card]) -> Move {
        Move::Play {
            selector: CardSelector::for_card(card),
            color: card.is_wild().then(|| Self::best_color(hand)),
        }
    }

    fn choose(player: &Player, top: &Card) -> Move {
        let hand = player.hand.as_slice();
        let held_back = Self::held_back(hand);
        let legal = move || hand.iter().filter(move |card| card.playable_on(top));

        let attacking = legal().find(|card| card.rank().is_special());
        let unambiguous = move || legal().filter(|card| !card.is_wild());

        attacking
            .or_else(|| unambiguous().find(|card| !held_back.contains(&card.rank())))
            .or_else(|| unambiguous().find(|card| held_back.contains(&card.rank())))
            .or_else(|| legal().next())
            .map_or(Move::Draw, |card| Self::play(card, hand))
    }
}

impl MovePolicy for GreedyPolicy {
    fn select_move(&self, engine: &GameEngine, player_id: PlayerId) -> Result<TurnPlan> {
        let player = engine
            .get_player(&player_id)
            .ok_or(UnoError::PlayerNotFound(player_id))?;
        let top = engine.current_card()?;

        Ok(TurnPlan {
            call_uno: player.cards_count() == 2 && !player.uno_called,
            action: Self::choose(player, top),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnReport {
    Played(PlayOutcome),
    Drew(DrawOutcome),
}

/// Asks `policy` for the current player's move and performs it.
pub fn take_turn(engine: &mut GameEngine, policy: &dyn MovePolicy) -> Result<TurnReport> {
    let player_id = engine.current_player()?.id;
    let plan = policy.select_move(engine, player_id)?;
    debug!(player = player_id, plan = ?plan, "policy move");

    if plan.call_uno {
        engine.call_uno(player_id)?;
    }

    match plan.action {
        Move::Play { selector, color } => {
            let color = color.map(|color| color.to_string());
            engine
                .play(&selector, color.as_deref())
                .map(TurnReport::Played)
        }
        Move::Draw => engine.draw().map(TurnReport::Drew),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardId;

    fn colored(id: CardId, color: CardColor, rank: Rank) -> Card {
        Card::colored(id, color, rank).unwrap()
    }

    fn player_with(cards: Vec<Card>) -> Player {
        let mut player = Player::new(0, "AI-1".to_string(), true);
        player.hand = cards;
        player
    }

    fn chosen(player: &Player, top: &Card) -> Option<(Rank, Option<CardColor>)> {
        match GreedyPolicy::choose(player, top) {
            Move::Play { selector, color } => {
                let card = player.get_card(&selector)?;
                Some((card.rank(), if card.is_wild() { color } else { card.color() }))
            }
            Move::Draw => None,
        }
    }

    #[test]
    fn prefers_attacking_cards() {
        let top = colored(100, CardColor::Red, Rank::Number(5));
        let player = player_with(vec![
            colored(1, CardColor::Red, Rank::Number(3)),
            colored(2, CardColor::Red, Rank::Skip),
        ]);

        assert_eq!(
            chosen(&player, &top),
            Some((Rank::Skip, Some(CardColor::Red)))
        );
    }

    #[test]
    fn wild_takes_most_held_color() {
        let top = colored(100, CardColor::Red, Rank::Number(5));
        let player = player_with(vec![
            colored(1, CardColor::Blue, Rank::Number(1)),
            colored(2, CardColor::Green, Rank::Number(2)),
            colored(3, CardColor::Green, Rank::Number(3)),
            Card::wild(4, Rank::Wild).unwrap(),
        ]);

        assert_eq!(
            chosen(&player, &top),
            Some((Rank::Wild, Some(CardColor::Green)))
        );
    }

    #[test]
    fn wild_defaults_to_red_without_colored_cards() {
        let top = colored(100, CardColor::Blue, Rank::Number(5));
        let player = player_with(vec![Card::wild(1, Rank::WildDrawFour).unwrap()]);

        assert_eq!(
            chosen(&player, &top),
            Some((Rank::WildDrawFour, Some(CardColor::Red)))
        );
    }

    #[test]
    fn keeps_numbers_held_in_several_colors() {
        let top = colored(100, CardColor::Red, Rank::Number(5));
        let player = player_with(vec![
            colored(1, CardColor::Red, Rank::Number(7)),
            colored(2, CardColor::Blue, Rank::Number(7)),
            colored(3, CardColor::Red, Rank::Number(2)),
        ]);

        assert_eq!(
            chosen(&player, &top),
            Some((Rank::Number(2), Some(CardColor::Red)))
        );
    }

    #[test]
    fn draws_without_legal_card() {
        let top = colored(100, CardColor::Red, Rank::Number(5));
        let player = player_with(vec![colored(1, CardColor::Blue, Rank::Number(3))]);

        assert_eq!(GreedyPolicy::choose(&player, &top), Move::Draw);
    }
}
