use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// Rotating seat order. The front holds the turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnQueue(VecDeque<PlayerId>);

impl TurnQueue {
    pub fn new(player_ids: impl IntoIterator<Item = PlayerId>) -> Self {
        Self(player_ids.into_iter().collect())
    }

    pub fn current(&self) -> Option<PlayerId> {
        self.0.front().copied()
    }

    pub fn next(&self) -> Option<PlayerId> {
        self.0.get(1).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.0.contains(&player_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.0.iter().copied()
    }

    /// Moves the front player to the back.
    pub(crate) fn rotate(&mut self) {
        if let Some(front) = self.0.pop_front() {
            self.0.push_back(front);
        }
    }

    pub(crate) fn reverse(&mut self) {
        self.0.make_contiguous().reverse();
    }

    /// Reverses the order while the current player keeps the turn, so the
    /// following advance lands on whoever used to play before them.
    pub(crate) fn reverse_anchored(&mut self) {
        self.reverse();
        if let Some(current) = self.0.pop_back() {
            self.0.push_front(current);
        }
    }

    /// Passes the turn on and drops every player `is_finished` reports.
    pub(crate) fn advance(&mut self, is_finished: impl Fn(PlayerId) -> bool) -> Option<PlayerId> {
        self.rotate();
        self.0.retain(|player_id| !is_finished(*player_id));
        self.current()
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(queue: &TurnQueue) -> Vec<PlayerId> {
        queue.iter().collect()
    }

    #[test]
    fn advance_moves_turn_to_next_player() {
        let mut queue = TurnQueue::new([0, 1, 2, 3]);

        assert_eq!(queue.advance(|_| false), Some(1));
        assert_eq!(order(&queue), vec![1, 2, 3, 0]);
    }

    #[test]
    fn advance_drops_finished_players() {
        let mut queue = TurnQueue::new([0, 1, 2]);

        assert_eq!(queue.advance(|id| id == 0), Some(1));
        assert_eq!(order(&queue), vec![1, 2]);
    }

    #[test]
    fn reverse_anchored_keeps_current_player_in_front() {
        let mut queue = TurnQueue::new([0, 1, 2, 3]);

        queue.reverse_anchored();
        assert_eq!(order(&queue), vec![0, 3, 2, 1]);

        assert_eq!(queue.advance(|_| false), Some(3));
    }

    #[test]
    fn rotate_then_advance_skips_one_player() {
        let mut queue = TurnQueue::new([0, 1, 2]);

        queue.rotate();
        assert_eq!(queue.advance(|_| false), Some(2));
    }
}
