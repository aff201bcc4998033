use std::env::var;

use color_eyre::eyre::{eyre, Result, WrapErr};
use unorules::{rules::RuleSet, GameEngine};

/// Table setup read from `UNO_*` environment variables.
#[derive(Debug)]
pub struct Config {
    pub humans: Vec<String>,
    pub ai_players: usize,
    pub seed: Option<u64>,
    pub rules: RuleSet,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let humans = match var("UNO_PLAYERS") {
            Ok(names) => split_list(&names).map(ToString::to_string).collect(),
            Err(_) => vec!["Player 1".to_string()],
        };
        let ai_players = match var("UNO_AI") {
            Ok(count) => count
                .trim()
                .parse()
                .wrap_err_with(|| format!("`UNO_AI` must be a number, got `{count}`"))?,
            Err(_) => 1,
        };
        let seed = var("UNO_SEED")
            .ok()
            .map(|seed| {
                seed.trim()
                    .parse()
                    .wrap_err_with(|| format!("`UNO_SEED` must be a number, got `{seed}`"))
            })
            .transpose()?;
        let rules = match var("UNO_RULES") {
            Ok(overrides) => parse_rules(&overrides)?,
            Err(_) => RuleSet::default(),
        };

        Ok(Self {
            humans,
            ai_players,
            seed,
            rules,
        })
    }

    /// Seats humans first, then the computer players.
    pub fn create_game(&self) -> Result<GameEngine> {
        let mut engine = match self.seed {
            Some(seed) => GameEngine::with_seed(self.rules.clone(), seed),
            None => GameEngine::new(self.rules.clone()),
        };

        for name in &self.humans {
            engine.add_player(name.clone(), false)?;
        }
        for i in 0..self.ai_players {
            engine.add_player(format!("AI-{}", i + 1), true)?;
        }
        Ok(engine)
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Reads `name=value` pairs such as `decks=2,must play=on`.
fn parse_rules(overrides: &str) -> Result<RuleSet> {
    let pairs = split_list(overrides)
        .map(|pair| {
            pair.split_once('=')
                .ok_or_else(|| eyre!("Rule override `{pair}` is not `name=value`"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RuleSet::from_overrides(pairs)?)
}
