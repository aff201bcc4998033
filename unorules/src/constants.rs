use strum::EnumCount;

use crate::card::CardColor;

pub(crate) const NUMBER_CARDS_PER_COLOR: &[u8] =
    &[0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9];
pub(crate) const SKIP_CARDS_PER_COLOR: usize = 2;
pub(crate) const REVERSE_CARDS_PER_COLOR: usize = 2;
pub(crate) const DRAW_TWO_CARDS_PER_COLOR: usize = 2;

pub(crate) const CARDS_PER_COLOR: usize = NUMBER_CARDS_PER_COLOR.len()
    + SKIP_CARDS_PER_COLOR
    + REVERSE_CARDS_PER_COLOR
    + DRAW_TWO_CARDS_PER_COLOR;

pub(crate) const WILD_CARDS_IN_DECK: usize = 4;
pub(crate) const WILD_DRAW_FOUR_CARDS_IN_DECK: usize = 4;

/// Cards in one standard pack.
pub const CARDS_PER_DECK: usize =
    CARDS_PER_COLOR * CardColor::COUNT + WILD_CARDS_IN_DECK + WILD_DRAW_FOUR_CARDS_IN_DECK;

pub const MIN_PLAYERS: usize = 2;

/// Cards moved by a +2 and a Wild+4.
pub(crate) const DRAW_TWO_PENALTY: usize = 2;
pub(crate) const WILD_DRAW_FOUR_PENALTY: usize = 4;

/// Hand size at or below which UNO may be called.
pub(crate) const UNO_HAND_SIZE: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_card_count_constants() {
        assert_eq!(NUMBER_CARDS_PER_COLOR.len(), 19);
        assert_eq!(CARDS_PER_COLOR, 25);
        assert_eq!(CARDS_PER_DECK, 108);
    }
}
