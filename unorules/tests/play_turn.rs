use unorules::{
    card::{Card, CardColor, Rank},
    constants::CARDS_PER_DECK,
    policy::{take_turn, GreedyPolicy, TurnReport},
    rules::RuleSet,
    turn::{CardSelector, Effect},
    GameEngine, UnoError,
};

fn create_player_names(count: usize) -> Vec<String> {
    let mut player_names = Vec::new();
    for i in 0..count {
        player_names.push(format!("Player {}", i + 1));
    }
    player_names
}

fn start_game(count: usize, seed: u64, is_ai: bool) -> GameEngine {
    let mut engine = GameEngine::with_seed(RuleSet::default(), seed);
    for name in create_player_names(count) {
        engine.add_player(name, is_ai).unwrap();
    }
    engine.start().unwrap();
    engine
}

/// A color the current card accepts.
fn matching_color(engine: &GameEngine) -> CardColor {
    engine
        .current_card()
        .unwrap()
        .color()
        .unwrap_or(CardColor::Red)
}

fn total_cards(engine: &GameEngine) -> usize {
    engine.deck().cards_count()
        + engine.discard().cards_count()
        + engine
            .get_player_ids()
            .iter()
            .map(|id| engine.get_player(id).unwrap().cards_count())
            .sum::<usize>()
}

#[test]
fn play_turn_works_if_card_in_hand() {
    let mut engine = start_game(4, 1, false);
    let color = matching_color(&engine);
    let current_player_id = engine.current_player().unwrap().id;

    let player = engine
        .get_player_mut(&current_player_id)
        .expect("Current player must exist.");

    // Swap in a number card of the active color so the play below is legal
    player.hand[0] = Card::colored(5000, color, Rank::Number(1)).unwrap();

    let outcome = engine
        .play(&CardSelector::colored(color.to_string(), "1"), None)
        .unwrap();

    assert_eq!(outcome.effect, Effect::Neutral);
    assert_eq!(outcome.next_player, Some(1));
    assert!(engine
        .current_card()
        .unwrap()
        .same_value(&Card::colored(0, color, Rank::Number(1)).unwrap()));
}

#[test]
fn play_turn_fails_if_card_not_in_hand() {
    let mut engine = start_game(4, 2, false);
    let current_player_id = engine.current_player().unwrap().id;

    let player = engine
        .get_player_mut(&current_player_id)
        .expect("Current player must exist.");

    // Drop every "Red 1" so we can check it cannot be played
    player
        .hand
        .retain(|card| !(card.rank() == Rank::Number(1) && card.color() == Some(CardColor::Red)));

    let last_played_card_before = engine.current_card().unwrap().clone();

    let result = engine.play(&CardSelector::colored("red", "1"), None);

    assert!(matches!(result, Err(UnoError::CardNotInHand(_))));
    assert_eq!(engine.current_card().unwrap(), &last_played_card_before);
    assert_eq!(engine.current_player().unwrap().id, current_player_id);
}

#[test]
fn play_turn_skips_player_properly() {
    let mut engine = start_game(4, 3, false);
    let color = matching_color(&engine);

    let player = engine
        .get_player_mut(&0)
        .expect("Current player must exist.");

    // We change the first card of the player to a Skip so we can test for it below
    player.hand[0] = Card::colored(5000, color, Rank::Skip).unwrap();

    let outcome = engine
        .play(&CardSelector::colored(color.to_string(), "skip"), None)
        .unwrap();

    assert_eq!(outcome.effect, Effect::Skipped(1));
    assert_eq!(engine.current_player().unwrap().id, 2);
}

#[test]
fn play_turn_performs_reverse_properly() {
    let mut engine = start_game(4, 4, false);
    let color = matching_color(&engine);

    let player = engine
        .get_player_mut(&0)
        .expect("Current player must exist.");

    // We change the first card of the player to a Reverse so we can test for it below
    player.hand[0] = Card::colored(5000, color, Rank::Reverse).unwrap();

    let outcome = engine
        .play(&CardSelector::colored(color.to_string(), "reverse"), None)
        .unwrap();

    assert_eq!(outcome.effect, Effect::Reversed);
    assert_eq!(engine.current_player().unwrap().id, 3);
    assert_eq!(engine.queue().iter().collect::<Vec<_>>(), vec![3, 2, 1, 0]);
}

#[test]
fn play_turn_performs_draw_properly() {
    let mut engine = start_game(4, 5, false);
    let color = matching_color(&engine);

    let player = engine
        .get_player_mut(&0)
        .expect("Current player must exist.");

    // We change the first card of the player to a +2 so we can test for it below
    player.hand[0] = Card::colored(5000, color, Rank::DrawTwo).unwrap();

    let outcome = engine
        .play(&CardSelector::colored(color.to_string(), "+2"), None)
        .unwrap();

    assert_eq!(
        outcome.effect,
        Effect::Drew {
            player: 1,
            count: 2,
            skipped: true
        }
    );
    assert_eq!(engine.get_player(&1).unwrap().cards_count(), 9);
    assert_eq!(engine.current_player().unwrap().id, 2);
}

#[test]
fn computer_players_finish_a_game() {
    for seed in [11, 12, 13] {
        let mut engine = start_game(4, seed, true);
        let mut turns = 0;

        while !engine.is_finished() {
            assert!(turns < 5000, "game with seed {seed} did not finish");
            let current_player_id = engine.current_player().unwrap().id;
            let top = engine.current_card().unwrap().clone();

            match take_turn(&mut engine, &GreedyPolicy).unwrap() {
                TurnReport::Played(outcome) => {
                    assert_eq!(outcome.player, current_player_id);
                    assert!(outcome.card.playable_on(&top));
                }
                TurnReport::Drew(outcome) => assert_eq!(outcome.player, current_player_id),
            }
            assert_eq!(total_cards(&engine), CARDS_PER_DECK);
            turns += 1;
        }

        let scoreboard = engine.scoreboard();
        let ranks = scoreboard
            .standings
            .iter()
            .map(|standing| standing.rank)
            .collect::<Vec<_>>();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        assert!(matches!(
            take_turn(&mut engine, &GreedyPolicy),
            Err(UnoError::GameOver)
        ));
    }
}

#[test]
fn rule_overrides_change_the_deal() {
    let rules = RuleSet::from_overrides([("decks", "2"), ("initial cards", "10")]).unwrap();
    let mut engine = GameEngine::with_seed(rules, 9);
    for name in create_player_names(3) {
        engine.add_player(name, false).unwrap();
    }
    engine.start().unwrap();

    assert_eq!(engine.current_player().unwrap().cards_count(), 10);
    assert_eq!(total_cards(&engine), 2 * CARDS_PER_DECK);

    assert!(matches!(
        RuleSet::from_overrides([("decks", "0")]),
        Err(UnoError::RuleOutOfRange { .. })
    ));
    assert!(matches!(
        RuleSet::from_overrides([("draws skip", "maybe")]),
        Err(UnoError::InvalidRuleValue { .. })
    ));
    assert!(matches!(
        RuleSet::from_overrides([("stacking", "on")]),
        Err(UnoError::RuleNotFound(_))
    ));
}
