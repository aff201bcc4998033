use std::{collections::BTreeMap, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::card::{Card, CardColor, CardId, Rank};
use crate::clock::{system_clock, Clock};
use crate::constants::{DRAW_TWO_PENALTY, MIN_PLAYERS, WILD_DRAW_FOUR_PENALTY};
use crate::deck::{Deck, DiscardPile};
use crate::error::{Result, UnoError};
use crate::player::{Player, PlayerId};
use crate::queue::TurnQueue;
use crate::rng::GameRng;
use crate::rules::RuleSet;
use crate::summary::{Scoreboard, Seat, Standing, TableSummary};
use crate::turn::{CalloutOutcome, CardSelector, DrawOutcome, Effect, PlayOutcome};

/// One game of UNO: deck, discard pile, seats and turn order.
///
/// Every command either applies completely or returns an error and leaves
/// the game untouched. The whole value serializes into an opaque snapshot
/// (see [`GameEngine::snapshot`]); the clock is not part of it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEngine {
    rules: RuleSet,
    players: BTreeMap<PlayerId, Player>,
    queue: TurnQueue,
    deck: Deck,
    discard: DiscardPile,
    finished: Vec<PlayerId>,
    called_out: bool,
    cards_drawn: u64,
    next_card_id: CardId,
    started_at: Option<u64>,
    rng: GameRng,
    #[serde(skip, default = "system_clock")]
    clock: Arc<dyn Clock>,
}

impl GameEngine {
    pub fn new(rules: RuleSet) -> Self {
        Self::with_rng(rules, GameRng::from_entropy())
    }

    pub fn with_seed(rules: RuleSet, seed: u64) -> Self {
        Self::with_rng(rules, GameRng::new(seed))
    }

    pub fn with_rng(rules: RuleSet, rng: GameRng) -> Self {
        Self {
            rules,
            players: BTreeMap::new(),
            queue: TurnQueue::default(),
            deck: Deck::default(),
            discard: DiscardPile::default(),
            finished: Vec::new(),
            called_out: false,
            cards_drawn: 0,
            next_card_id: 0,
            started_at: None,
            rng,
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn add_player(&mut self, name: impl Into<String>, is_ai: bool) -> Result<PlayerId> {
        if self.started_at.is_some() {
            return Err(UnoError::GameAlreadyStarted);
        }
        let id = self.players.len() as PlayerId;
        self.players.insert(id, Player::new(id, name.into(), is_ai));
        Ok(id)
    }

    /// Builds and shuffles the deck, flips the first discard and deals the
    /// opening hands in seat order.
    pub fn start(&mut self) -> Result<()> {
        if self.started_at.is_some() {
            return Err(UnoError::GameAlreadyStarted);
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(UnoError::InsufficientPlayers {
                required: MIN_PLAYERS,
                found: self.players.len(),
            });
        }

        let mut next_card_id = self.next_card_id;
        let mut deck = Deck::build(&self.rules, &mut next_card_id)?;
        deck.shuffle(&mut self.rng);

        let first_card = deck.draw().ok_or(UnoError::InsufficientCards {
            needed: 1,
            available: 0,
        })?;
        let hand_size = self.rules.initial_hand_size();
        let needed = hand_size * self.players.len();
        if needed > deck.cards_count() {
            return Err(UnoError::InsufficientCards {
                needed,
                available: deck.cards_count(),
            });
        }

        self.next_card_id = next_card_id;
        self.deck = deck;
        self.discard = DiscardPile::default();
        self.discard.push(first_card);
        self.queue = TurnQueue::new(self.players.keys().copied());
        self.started_at = Some(self.clock.now_millis());

        let seats = self.queue.iter().collect::<Vec<_>>();
        for player_id in seats {
            self.deal(player_id, hand_size)?;
        }

        info!(
            players = self.players.len(),
            decks = self.rules.deck_count(),
            first_card = %self.discard.top().map(ToString::to_string).unwrap_or_default(),
            "game started"
        );
        Ok(())
    }

    /// Plays the current player's card named by `selector`. A wild takes
    /// `chosen_color` if given and stays colorless otherwise.
    pub fn play(
        &mut self,
        selector: &CardSelector,
        chosen_color: Option<&str>,
    ) -> Result<PlayOutcome> {
        let player_id = self.turn_holder()?;
        let top = self.top_card()?.clone();
        let mut card = self
            .player(player_id)?
            .get_card(selector)
            .cloned()
            .ok_or_else(|| UnoError::CardNotInHand(selector.to_string()))?;

        if !card.playable_on(&top) {
            return Err(UnoError::IllegalPlay { card, top });
        }
        if let (true, Some(token)) = (card.is_wild(), chosen_color) {
            card.resolve_color(CardColor::parse(token)?)?;
        }

        // Nothing has changed yet; from here on the play goes through.
        let active_players = self.queue.len();
        self.called_out = false;

        let player = self.player_mut(player_id)?;
        player.remove_card(card.id());
        let hand_empty = player.hand.is_empty();
        let name = player.name().to_string();
        self.discard.push(card.clone());
        debug!(player = player_id, card = %card, "card played");

        let mut narrative = Vec::new();
        let mut finished_rank = None;
        if hand_empty {
            let rank = self.finish_player(player_id);
            finished_rank = Some(rank);
            narrative.push(format!(
                "{name} has no more cards. They finished in rank {rank}!"
            ));

            if active_players == 2 {
                if let Some(runner_up) = self.queue.next() {
                    self.finish_player(runner_up);
                }
                self.queue.clear();
                info!(winner = ?self.finished.first(), "game over");

                let effect = if card.is_wild() {
                    Effect::ColorChosen(card.color())
                } else {
                    Effect::Neutral
                };
                return Ok(PlayOutcome {
                    player: player_id,
                    card,
                    effect,
                    finished_rank,
                    game_over: true,
                    next_player: None,
                    narrative: narrative.join("\n"),
                });
            }
        }

        let (effect, description) = self.apply_effect(&card)?;
        if !description.is_empty() {
            narrative.push(description);
        }
        let next_player = self.advance();

        Ok(PlayOutcome {
            player: player_id,
            card,
            effect,
            finished_rank,
            game_over: false,
            next_player,
            narrative: narrative.join("\n"),
        })
    }

    /// Resolves the color of a wild left colorless on top of the discard pile.
    pub fn choose_color(&mut self, color: &str) -> Result<CardColor> {
        self.turn_holder()?;
        let color = CardColor::parse(color)?;
        let top = self.discard.top_mut().ok_or(UnoError::GameNotStarted)?;
        top.resolve_color(color)?;
        debug!(%color, "wild color chosen");
        Ok(color)
    }

    /// Current player picks up one card and passes the turn.
    pub fn draw(&mut self) -> Result<DrawOutcome> {
        let player_id = self.turn_holder()?;
        if self.rules.must_play() {
            let top = self.top_card()?;
            if self.player(player_id)?.has_playable_card(top) {
                return Err(UnoError::MustPlayAvailable { top: top.clone() });
            }
        }

        let card = self.deal(player_id, 1)?.pop();
        debug!(player = player_id, drew = card.is_some(), "card drawn");
        let next_player = self.advance();

        Ok(DrawOutcome {
            player: player_id,
            card,
            next_player,
        })
    }

    pub fn call_uno(&mut self, player_id: PlayerId) -> Result<()> {
        self.turn_holder()?;
        if !self.queue.contains(player_id) {
            return Err(UnoError::PlayerNotFound(player_id));
        }
        self.player_mut(player_id)?.uno()?;
        debug!(player = player_id, "uno called");
        Ok(())
    }

    /// Penalizes every active player sitting on one card without having
    /// called UNO, or the caller when there is no one to catch.
    pub fn callout(&mut self, caller: PlayerId) -> Result<CalloutOutcome> {
        self.turn_holder()?;
        if !self.rules.callouts() {
            return Err(UnoError::CalloutsDisabled);
        }
        self.player(caller)?;
        if self.called_out {
            return Err(UnoError::AlreadyCalledOutThisTurn);
        }

        let offenders = self
            .queue
            .iter()
            .filter(|id| {
                self.players
                    .get(id)
                    .map_or(false, |player| player.cards_count() == 1 && !player.uno_called)
            })
            .collect::<Vec<_>>();

        let mut penalized = Vec::new();
        let mut narrative = Vec::new();
        let false_callout = offenders.is_empty();
        if false_callout {
            let penalty = self.rules.false_callout_penalty();
            let dealt = self.deal(caller, penalty)?.len();
            penalized.push((caller, dealt));
            narrative.push(format!("There was no one to call out! Pick up {penalty}"));
        } else {
            let penalty = self.rules.callout_penalty();
            for offender in offenders {
                let dealt = self.deal(offender, penalty)?.len();
                penalized.push((offender, dealt));
                narrative.push(format!(
                    "{} you did not say UNO! Pick up {penalty}",
                    self.player(offender)?.name()
                ));
            }
        }
        self.called_out = true;
        debug!(caller, false_callout, penalized = ?penalized, "callout");

        Ok(CalloutOutcome {
            caller,
            penalized,
            false_callout,
            narrative: narrative.join("\n"),
        })
    }

    pub fn current_player(&self) -> Result<&Player> {
        self.player(self.turn_holder()?)
    }

    pub fn current_card(&self) -> Result<&Card> {
        self.top_card()
    }

    pub fn table_summary(&self) -> Result<TableSummary> {
        let top_card = self.top_card()?.clone();
        let seats = self
            .queue
            .iter()
            .filter_map(|id| self.players.get(&id))
            .map(|player| Seat {
                player: player.id,
                name: player.name().to_string(),
                cards: player.cards_count(),
            })
            .collect();

        Ok(TableSummary {
            top_card,
            current_player: self.queue.current(),
            seats,
            elapsed: self.elapsed(),
            cards_drawn: self.cards_drawn,
        })
    }

    pub fn scoreboard(&self) -> Scoreboard {
        let standings = self
            .finished
            .iter()
            .enumerate()
            .filter_map(|(position, id)| {
                self.players.get(id).map(|player| Standing {
                    rank: position + 1,
                    player: *id,
                    name: player.name().to_string(),
                })
            })
            .collect();

        Scoreboard {
            standings,
            elapsed: self.elapsed(),
            cards_drawn: self.cards_drawn,
        }
    }

    /// Serializes the full game state.
    pub fn snapshot(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuilds a game from [`GameEngine::snapshot`] output. The restored game
    /// reads the system clock until [`GameEngine::with_clock`] says otherwise.
    pub fn restore(snapshot: &str) -> Result<Self> {
        Ok(serde_json::from_str(snapshot)?)
    }

    pub fn get_player_ids(&self) -> Vec<PlayerId> {
        self.players.keys().copied().collect()
    }

    pub fn get_player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.get(player_id)
    }

    pub fn get_player_mut(&mut self, player_id: &PlayerId) -> Option<&mut Player> {
        self.players.get_mut(player_id)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn queue(&self) -> &TurnQueue {
        &self.queue
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn discard(&self) -> &DiscardPile {
        &self.discard
    }

    pub fn cards_drawn(&self) -> u64 {
        self.cards_drawn
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.is_started() && self.queue.is_empty()
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.map_or(Duration::ZERO, |started_at| {
            Duration::from_millis(self.clock.now_millis().saturating_sub(started_at))
        })
    }

    fn turn_holder(&self) -> Result<PlayerId> {
        if self.started_at.is_none() {
            return Err(UnoError::GameNotStarted);
        }
        self.queue.current().ok_or(UnoError::GameOver)
    }

    fn top_card(&self) -> Result<&Card> {
        self.discard.top().ok_or(UnoError::GameNotStarted)
    }

    fn player(&self, player_id: PlayerId) -> Result<&Player> {
        self.players
            .get(&player_id)
            .ok_or(UnoError::PlayerNotFound(player_id))
    }

    fn player_mut(&mut self, player_id: PlayerId) -> Result<&mut Player> {
        self.players
            .get_mut(&player_id)
            .ok_or(UnoError::PlayerNotFound(player_id))
    }

    /// Moves up to `count` cards from the deck into a hand, recycling the
    /// discard pile first when the deck runs short. Stops quietly when both
    /// run dry.
    fn deal(&mut self, player_id: PlayerId, count: usize) -> Result<Vec<Card>> {
        self.player(player_id)?;
        if self.deck.cards_count() < count {
            self.reshuffle(count)?;
        }

        let mut dealt = Vec::with_capacity(count);
        while dealt.len() < count {
            match self.deck.draw() {
                Some(card) => dealt.push(card),
                None => break,
            }
        }
        self.cards_drawn += dealt.len() as u64;
        self.player_mut(player_id)?.add_cards(dealt.iter().cloned());

        if dealt.len() < count {
            debug!(player = player_id, count, dealt = dealt.len(), "partial deal");
        }
        Ok(dealt)
    }

    fn reshuffle(&mut self, needed: usize) -> Result<()> {
        if self.discard.is_empty() {
            return Err(UnoError::InsufficientCards {
                needed,
                available: self.deck.cards_count(),
            });
        }

        let recycled = self.discard.take_all_but_top();
        debug!(recycled = recycled.len(), "reshuffling discard pile into deck");
        self.deck.refill(recycled);
        self.deck.shuffle(&mut self.rng);
        Ok(())
    }

    fn finish_player(&mut self, player_id: PlayerId) -> usize {
        self.finished.push(player_id);
        let rank = self.finished.len();
        if let Some(player) = self.players.get_mut(&player_id) {
            player.finish(rank);
        }
        info!(player = player_id, rank, "player finished");
        rank
    }

    fn advance(&mut self) -> Option<PlayerId> {
        let players = &self.players;
        self.queue
            .advance(|id| players.get(&id).map_or(true, Player::is_finished))
    }

    /// Applies the played card's side effect while its player still holds the
    /// front of the queue.
    fn apply_effect(&mut self, card: &Card) -> Result<(Effect, String)> {
        let result = match card.rank() {
            Rank::Reverse => {
                if self.queue.len() > 2 {
                    self.queue.reverse_anchored();
                    (
                        Effect::Reversed,
                        "Turns are now in reverse order!".to_string(),
                    )
                } else if !self.rules.reverses_skip() {
                    // Reversing two seats changes nothing
                    (Effect::Neutral, String::new())
                } else {
                    self.queue.reverse();
                    let Some(skipped) = self.queue.current() else {
                        return Ok((Effect::Neutral, String::new()));
                    };
                    (
                        Effect::Skipped(skipped),
                        format!("{}, skip a turn!", self.player(skipped)?.name()),
                    )
                }
            }
            Rank::Skip => {
                let Some(skipped) = self.queue.next() else {
                    return Ok((Effect::Neutral, String::new()));
                };
                self.queue.rotate();
                (
                    Effect::Skipped(skipped),
                    format!("{}, skip a turn!", self.player(skipped)?.name()),
                )
            }
            Rank::DrawTwo => self.apply_draw(DRAW_TWO_PENALTY, String::new())?,
            Rank::WildDrawFour => {
                let color = format!(" The current color is now {}", Self::color_text(card));
                self.apply_draw(WILD_DRAW_FOUR_PENALTY, color)?
            }
            Rank::Wild => (
                Effect::ColorChosen(card.color()),
                format!("The color is now {}", Self::color_text(card)),
            ),
            Rank::Number(_) => (Effect::Neutral, String::new()),
        };

        debug!(effect = ?result.0, "effect applied");
        Ok(result)
    }

    /// The next player picks up `count`; with Draws Skip they also lose
    /// exactly one turn.
    fn apply_draw(&mut self, count: usize, suffix: String) -> Result<(Effect, String)> {
        let Some(target) = self.queue.next() else {
            return Ok((Effect::Neutral, String::new()));
        };
        let dealt = self.deal(target, count)?.len();

        let skipped = self.rules.draws_skip();
        let mut description = format!("{} picks up {dealt}!{suffix}", self.player(target)?.name());
        if skipped {
            self.queue.rotate();
            description.push_str(" Also, skip a turn!");
        }

        Ok((
            Effect::Drew {
                player: target,
                count: dealt,
                skipped,
            },
            description,
        ))
    }

    fn color_text(card: &Card) -> &'static str {
        match card.color() {
            Some(_) => card.color_name(),
            None => "wild",
        }
    }
}
