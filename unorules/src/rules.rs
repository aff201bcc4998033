//! Per-game rule configuration.
//!
//! A [`RuleSet`] is resolved once before the game starts and only read while
//! playing. Rules are looked up by [`RuleName`], which parses case-insensitively
//! from the display names drivers show to users ("Draws Skip", "draws-skip").

use core::fmt;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{Result, UnoError};

#[derive(
    Clone, Copy, Debug, Display, EnumString, EnumIter, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum RuleName {
    #[strum(to_string = "Decks", serialize = "deck count", serialize = "deck-count")]
    Decks,
    #[strum(
        to_string = "Initial Cards",
        serialize = "initial-cards",
        serialize = "initial_cards",
        serialize = "hand size"
    )]
    InitialCards,
    #[strum(to_string = "Draws Skip", serialize = "draws-skip", serialize = "draws_skip")]
    DrawsSkip,
    #[strum(
        to_string = "Reverses Skip",
        serialize = "reverses-skip",
        serialize = "reverses_skip"
    )]
    ReversesSkip,
    #[strum(to_string = "Must Play", serialize = "must-play", serialize = "must_play")]
    MustPlay,
    #[strum(to_string = "Callouts")]
    Callouts,
    #[strum(
        to_string = "Callout Penalty",
        serialize = "callout-penalty",
        serialize = "callout_penalty"
    )]
    CalloutPenalty,
    #[strum(
        to_string = "False Callout Penalty",
        serialize = "false-callout-penalty",
        serialize = "false_callout_penalty"
    )]
    FalseCalloutPenalty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleKind {
    Integer,
    Boolean,
}

#[derive(Clone, Copy, Debug)]
pub struct RuleDefinition {
    pub description: &'static str,
    pub kind: RuleKind,
    pub default: RuleValue,
    pub min: u32,
    pub max: u32,
}

impl RuleName {
    pub fn definition(self) -> RuleDefinition {
        use RuleKind::*;
        use RuleValue as V;

        let (description, kind, default, min, max) = match self {
            RuleName::Decks => ("The number of decks to use.", Integer, V::Integer(1), 1, 8),
            RuleName::InitialCards => (
                "How many cards to pick up at the beginning.",
                Integer,
                V::Integer(7),
                1,
                5000,
            ),
            RuleName::DrawsSkip => (
                "Whether pickup cards (+2, +4) should also skip the next person's turn.",
                Boolean,
                V::Boolean(true),
                0,
                1,
            ),
            RuleName::ReversesSkip => (
                "Whether reverse cards skip turns when there's only two players left.",
                Boolean,
                V::Boolean(true),
                0,
                1,
            ),
            RuleName::MustPlay => (
                "Whether someone must play a card if they are able to.",
                Boolean,
                V::Boolean(false),
                0,
                1,
            ),
            RuleName::Callouts => (
                "Gives the ability to call someone out for not saying uno!",
                Boolean,
                V::Boolean(true),
                0,
                1,
            ),
            RuleName::CalloutPenalty => (
                "The number of cards to give someone when called out.",
                Integer,
                V::Integer(2),
                0,
                1000,
            ),
            RuleName::FalseCalloutPenalty => (
                "The number of cards to give someone for falsely calling someone out.",
                Integer,
                V::Integer(2),
                0,
                1000,
            ),
        };

        RuleDefinition {
            description,
            kind,
            default,
            min,
            max,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleValue {
    Integer(u32),
    Boolean(bool),
}

impl RuleValue {
    pub fn as_u32(self) -> u32 {
        match self {
            RuleValue::Integer(value) => value,
            RuleValue::Boolean(value) => value.into(),
        }
    }

    pub fn as_bool(self) -> bool {
        self.as_u32() != 0
    }

    fn kind(self) -> RuleKind {
        match self {
            RuleValue::Integer(_) => RuleKind::Integer,
            RuleValue::Boolean(_) => RuleKind::Boolean,
        }
    }

    fn parse(rule: RuleName, token: &str) -> Result<Self> {
        let token = token.trim();
        let invalid = || UnoError::InvalidRuleValue {
            rule,
            value: token.to_string(),
        };

        match rule.definition().kind {
            RuleKind::Integer => token.parse().map(RuleValue::Integer).map_err(|_| invalid()),
            RuleKind::Boolean => match token.to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => Ok(RuleValue::Boolean(true)),
                "0" | "false" | "off" | "no" => Ok(RuleValue::Boolean(false)),
                _ => Err(invalid()),
            },
        }
    }
}

impl From<u32> for RuleValue {
    fn from(value: u32) -> Self {
        RuleValue::Integer(value)
    }
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        RuleValue::Boolean(value)
    }
}

impl Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Integer(value) => write!(f, "{value}"),
            RuleValue::Boolean(true) => write!(f, "on"),
            RuleValue::Boolean(false) => write!(f, "off"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: RuleName,
    pub value: RuleValue,
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let definition = self.name.definition();
        let kind = match definition.kind {
            RuleKind::Integer => "integer",
            RuleKind::Boolean => "boolean",
        };
        writeln!(f, "*{}*", self.name)?;
        writeln!(f, "Type: {kind}")?;
        writeln!(f, "Value: {}", self.value)?;
        writeln!(f, "Range: {} to {}", definition.min, definition.max)?;
        write!(f, "{}", definition.description)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            rules: RuleName::iter()
                .map(|name| Rule {
                    name,
                    value: name.definition().default,
                })
                .collect(),
        }
    }
}

impl RuleSet {
    /// Returns a copy with `name` set to `value`, validated against the
    /// rule's type and range.
    pub fn with(mut self, name: RuleName, value: impl Into<RuleValue>) -> Result<Self> {
        let value = value.into();
        let definition = name.definition();

        if value.kind() != definition.kind {
            return Err(UnoError::InvalidRuleValue {
                rule: name,
                value: value.to_string(),
            });
        }
        let raw = value.as_u32();
        if raw < definition.min || raw > definition.max {
            return Err(UnoError::RuleOutOfRange {
                rule: name,
                value: raw,
                min: definition.min,
                max: definition.max,
            });
        }

        if let Some(rule) = self.rules.iter_mut().find(|rule| rule.name == name) {
            rule.value = value;
        } else {
            self.rules.push(Rule { name, value });
        }
        Ok(self)
    }

    /// Applies textual `name=value` pairs on top of the defaults.
    pub fn from_overrides<I, K, V>(overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        overrides
            .into_iter()
            .try_fold(Self::default(), |rules, (name, value)| {
                let name = Self::resolve_name(name.as_ref())?;
                let value = RuleValue::parse(name, value.as_ref())?;
                rules.with(name, value)
            })
    }

    pub fn resolve_name(name: &str) -> Result<RuleName> {
        name.trim()
            .parse()
            .map_err(|_| UnoError::RuleNotFound(name.to_string()))
    }

    pub fn lookup(&self, name: &str) -> Result<&Rule> {
        let name = Self::resolve_name(name)?;
        self.rules
            .iter()
            .find(|rule| rule.name == name)
            .ok_or_else(|| UnoError::RuleNotFound(name.to_string()))
    }

    pub fn get(&self, name: RuleName) -> RuleValue {
        self.rules
            .iter()
            .find(|rule| rule.name == name)
            .map_or(name.definition().default, |rule| rule.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn deck_count(&self) -> usize {
        self.get(RuleName::Decks).as_u32() as usize
    }

    pub fn initial_hand_size(&self) -> usize {
        self.get(RuleName::InitialCards).as_u32() as usize
    }

    pub fn draws_skip(&self) -> bool {
        self.get(RuleName::DrawsSkip).as_bool()
    }

    pub fn reverses_skip(&self) -> bool {
        self.get(RuleName::ReversesSkip).as_bool()
    }

    pub fn must_play(&self) -> bool {
        self.get(RuleName::MustPlay).as_bool()
    }

    pub fn callouts(&self) -> bool {
        self.get(RuleName::Callouts).as_bool()
    }

    pub fn callout_penalty(&self) -> usize {
        self.get(RuleName::CalloutPenalty).as_u32() as usize
    }

    pub fn false_callout_penalty(&self) -> usize {
        self.get(RuleName::FalseCalloutPenalty).as_u32() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_house_rules() {
        let rules = RuleSet::default();

        assert_eq!(rules.deck_count(), 1);
        assert_eq!(rules.initial_hand_size(), 7);
        assert!(rules.draws_skip());
        assert!(rules.reverses_skip());
        assert!(!rules.must_play());
        assert!(rules.callouts());
        assert_eq!(rules.callout_penalty(), 2);
        assert_eq!(rules.false_callout_penalty(), 2);
        assert_eq!(rules.iter().count(), 8);
    }

    #[test]
    fn overrides_parse_names_and_values() {
        let rules = RuleSet::from_overrides([
            ("decks", "2"),
            ("Initial Cards", "5"),
            ("must-play", "on"),
            ("DRAWS SKIP", "false"),
        ])
        .unwrap();

        assert_eq!(rules.deck_count(), 2);
        assert_eq!(rules.initial_hand_size(), 5);
        assert!(rules.must_play());
        assert!(!rules.draws_skip());
    }

    #[test]
    fn unknown_rule_is_not_found() {
        let error = RuleSet::from_overrides([("stacking", "1")]).unwrap_err();
        assert!(matches!(error, UnoError::RuleNotFound(name) if name == "stacking"));
        assert!(matches!(
            RuleSet::default().lookup("jump-in"),
            Err(UnoError::RuleNotFound(_))
        ));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let error = RuleSet::default().with(RuleName::Decks, 9u32).unwrap_err();
        assert!(matches!(
            error,
            UnoError::RuleOutOfRange {
                rule: RuleName::Decks,
                value: 9,
                min: 1,
                max: 8
            }
        ));
        assert!(error.is_fatal());
    }

    #[test]
    fn mistyped_values_are_rejected() {
        assert!(matches!(
            RuleSet::default().with(RuleName::Callouts, 3u32),
            Err(UnoError::InvalidRuleValue { .. })
        ));
        assert!(matches!(
            RuleSet::from_overrides([("callouts", "maybe")]),
            Err(UnoError::InvalidRuleValue { .. })
        ));
    }

    #[test]
    fn rule_renders_for_drivers() {
        let rules = RuleSet::default();
        let rule = rules.lookup("callout penalty").unwrap();

        assert_eq!(
            rule.to_string(),
            "*Callout Penalty*\nType: integer\nValue: 2\nRange: 0 to 1000\nThe number of cards to give someone when called out."
        );
    }
}
