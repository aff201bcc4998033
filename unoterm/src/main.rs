mod config;

use std::io::{self, BufRead, Lines, StdinLock, Write};

use color_eyre::eyre::{eyre, Result};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::{info, warn};
use unorules::{
    player::PlayerId,
    policy::{take_turn, GreedyPolicy, TurnReport},
    turn::CardSelector,
    GameEngine, UnoError,
};

use crate::config::Config;

type Input<'a> = Lines<StdinLock<'a>>;

#[derive(Clone, Copy, Debug, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
enum Command {
    #[strum(to_string = "play", serialize = "p")]
    Play,
    #[strum(to_string = "draw", serialize = "d")]
    Draw,
    #[strum(to_string = "uno", serialize = "u")]
    Uno,
    #[strum(to_string = "callout", serialize = "c")]
    Callout,
    #[strum(to_string = "table", serialize = "t")]
    Table,
    #[strum(to_string = "hand", serialize = "h")]
    Hand,
    #[strum(to_string = "rules")]
    Rules,
    #[strum(to_string = "help", serialize = "?")]
    Help,
    #[strum(to_string = "quit", serialize = "q", serialize = "exit")]
    Quit,
}

impl Command {
    fn usage(self) -> &'static str {
        match self {
            Command::Play => "play <color> <rank> [color for wilds]",
            Command::Draw => "draw",
            Command::Uno => "uno",
            Command::Callout => "callout [player name]",
            Command::Table => "table",
            Command::Hand => "hand",
            Command::Rules => "rules",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }
}

enum Flow {
    /// The turn holder may still act.
    Stay,
    /// The turn moved on.
    Next,
    Quit,
}

fn prompt(input: &mut Input, text: &str) -> Result<Option<String>> {
    print!("{text}");
    io::stdout().flush()?;
    Ok(input.next().transpose()?)
}

fn player_by_name(engine: &GameEngine, name: &str) -> Option<PlayerId> {
    engine.get_player_ids().into_iter().find(|id| {
        engine
            .get_player(id)
            .map_or(false, |player| player.name().eq_ignore_ascii_case(name))
    })
}

fn print_turn(engine: &GameEngine) -> Result<()> {
    let player = engine.current_player()?;
    println!("\n{}", engine.table_summary()?);
    println!("{}, your hand: {}", player.name(), player.hand_summary());
    Ok(())
}

fn play_ai_turn(engine: &mut GameEngine) -> Result<()> {
    let name = engine.current_player()?.name().to_string();
    match take_turn(engine, &GreedyPolicy)? {
        TurnReport::Played(outcome) => {
            println!("{name} played {}", outcome.card);
            if !outcome.narrative.is_empty() {
                println!("{}", outcome.narrative);
            }
        }
        TurnReport::Drew(_) => println!("{name} drew a card"),
    }
    Ok(())
}

fn play_card(engine: &mut GameEngine, input: &mut Input, args: &str) -> Result<Flow> {
    let Some(selector) = CardSelector::parse(args) else {
        println!("Usage: {}", Command::Play.usage());
        return Ok(Flow::Stay);
    };

    // "play wild blue" reads as a wild with its color
    let chosen_color = selector.color.clone();
    let outcome = engine.play(&selector, chosen_color.as_deref())?;
    println!("You played {}", outcome.card);

    if outcome.card.is_wild() && outcome.card.color().is_none() && !outcome.game_over {
        loop {
            let Some(line) = prompt(input, "Choose a color (red, green, blue, yellow): ")? else {
                return Ok(Flow::Quit);
            };
            match engine.choose_color(&line) {
                Ok(color) => {
                    println!("The color is now {color}");
                    break;
                }
                Err(err) => println!("{err}"),
            }
        }
    }

    if !outcome.narrative.is_empty() {
        println!("{}", outcome.narrative);
    }
    Ok(Flow::Next)
}

fn run_command(engine: &mut GameEngine, input: &mut Input, line: &str) -> Result<Flow> {
    let (word, args) = line.trim().split_once(' ').unwrap_or((line.trim(), ""));
    let Ok(command) = word.parse::<Command>() else {
        println!("Unknown command `{word}`, try `help`");
        return Ok(Flow::Stay);
    };
    let player_id = engine.current_player()?.id;

    match command {
        Command::Play => return play_card(engine, input, args),
        Command::Draw => {
            let outcome = engine.draw()?;
            match outcome.card {
                Some(card) => println!("You drew {card}"),
                None => println!("There were no cards left to draw"),
            }
            return Ok(Flow::Next);
        }
        Command::Uno => {
            engine.call_uno(player_id)?;
            println!("UNO!");
        }
        Command::Callout => {
            let caller = match args.trim() {
                "" => player_id,
                name => player_by_name(engine, name)
                    .ok_or_else(|| eyre!("No player named {name}"))?,
            };
            println!("{}", engine.callout(caller)?.narrative);
        }
        Command::Table => println!("{}", engine.table_summary()?),
        Command::Hand => println!("{}", engine.current_player()?.hand_summary()),
        Command::Rules => {
            for rule in engine.rules().iter() {
                println!("{rule}\n");
            }
        }
        Command::Help => {
            for command in Command::iter() {
                println!("  {}", command.usage());
            }
        }
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Stay)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let config = Config::from_env()?;
    let mut engine = config.create_game()?;
    engine.start()?;
    info!(players = engine.get_player_ids().len(), "starting terminal game");

    let stdin = io::stdin();
    let mut input = stdin.lock().lines();
    let mut show_turn = true;

    while !engine.is_finished() {
        if engine.current_player()?.is_ai() {
            play_ai_turn(&mut engine)?;
            show_turn = true;
            continue;
        }

        if show_turn {
            print_turn(&engine)?;
            show_turn = false;
        }
        let Some(line) = prompt(&mut input, "> ")? else {
            break;
        };

        match run_command(&mut engine, &mut input, &line) {
            Ok(Flow::Stay) => {}
            Ok(Flow::Next) => show_turn = true,
            Ok(Flow::Quit) => break,
            Err(report) => match report.downcast_ref::<UnoError>() {
                Some(err) if !err.is_fatal() => println!("{err}"),
                Some(_) => return Err(report),
                None => {
                    warn!(error = %report, "command failed");
                    println!("{report}");
                }
            },
        }
    }

    println!("\n{}", engine.scoreboard());
    Ok(())
}
