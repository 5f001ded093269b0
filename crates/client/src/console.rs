//! Line-oriented console for driving a hosted session.
//!
//! Mutations go through the host handle, except `observe`, which takes the
//! observer path (forwarded through the transport, result seen through
//! replication). Piece and settings commands poke the oracles directly, the
//! way unrelated gameplay would.

use std::fmt::Write as _;
use std::io::Write as _;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use combat_core::{
    CombatEnv, CombatSession, CombatantId, Disposition, Faction, LifecycleEvent, PieceId,
    SessionView,
};
use combat_runtime::{Event, Observer, OracleManager, RuntimeHandle, Topic, TurnControl};

const REPLICATION_WAIT: Duration = Duration::from_millis(500);

const HELP: &str = "\
commands:
  start <friendly|hostile>      begin combat with that side acting first
  take <id>                     mark a combatant's turn as taken (host)
  observe <id>                  same, sent through the observer
  back                          undo the last turn
  back-round                    step back into the previous round
  next-round                    force the round to roll over
  end                           end combat
  show                          print the current state
  defeat <piece> <on|off>       flag a piece as defeated
  dispose <piece> <disposition> change a piece's disposition
  skip-defeated <on|off>        leave defeated combatants out
  help                          this text
  quit                          leave";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start(Faction),
    Take(CombatantId),
    Observe(CombatantId),
    Back,
    BackRound,
    NextRound,
    End,
    Show,
    Defeat { piece: PieceId, defeated: bool },
    Dispose { piece: PieceId, disposition: Disposition },
    SkipDefeated(bool),
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let mut arg = |name: &str| {
            words
                .next()
                .ok_or_else(|| anyhow!("`{verb}` needs a {name}"))
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "start" => {
                let side = arg("faction")?;
                ConsoleCommand::Start(
                    side.parse()
                        .map_err(|_| anyhow!("unknown faction `{side}`"))?,
                )
            }
            "take" => ConsoleCommand::Take(CombatantId(parse_number(arg("combatant id")?)?)),
            "observe" => ConsoleCommand::Observe(CombatantId(parse_number(arg("combatant id")?)?)),
            "back" => ConsoleCommand::Back,
            "back-round" => ConsoleCommand::BackRound,
            "next-round" => ConsoleCommand::NextRound,
            "end" => ConsoleCommand::End,
            "show" => ConsoleCommand::Show,
            "defeat" => {
                let piece = PieceId(parse_number(arg("piece id")?)?);
                let defeated = parse_switch(arg("on/off")?)?;
                ConsoleCommand::Defeat { piece, defeated }
            }
            "dispose" => {
                let piece = PieceId(parse_number(arg("piece id")?)?);
                let value = arg("disposition")?;
                let disposition = value
                    .parse()
                    .map_err(|_| anyhow!("unknown disposition `{value}`"))?;
                ConsoleCommand::Dispose { piece, disposition }
            }
            "skip-defeated" => ConsoleCommand::SkipDefeated(parse_switch(arg("on/off")?)?),
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => bail!("unknown command `{other}` (try `help`)"),
        };
        Ok(Some(command))
    }
}

/// Accepts `3` as well as the `#3` form ids are displayed in.
fn parse_number(word: &str) -> Result<u32> {
    word.trim_start_matches('#')
        .parse()
        .with_context(|| format!("`{word}` is not an id"))
}

fn parse_switch(word: &str) -> Result<bool> {
    match word.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => bail!("expected on or off, got `{word}`"),
    }
}

/// Interactive front end over one host and one observer.
pub struct Console {
    handle: RuntimeHandle,
    observer: Observer,
    oracles: OracleManager,
}

impl Console {
    pub fn new(handle: RuntimeHandle, observer: Observer, oracles: OracleManager) -> Self {
        Self {
            handle,
            observer,
            oracles,
        }
    }

    /// Reads commands from stdin until `quit` or end of input.
    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("{HELP}\n");
        self.show().await?;

        loop {
            print!("> ");
            std::io::stdout().flush().ok();

            let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
                break;
            };

            match ConsoleCommand::parse(&line) {
                Ok(None) => {}
                Ok(Some(ConsoleCommand::Quit)) => break,
                Ok(Some(command)) => {
                    if let Err(e) = self.dispatch(command).await {
                        println!("error: {e:#}");
                    }
                }
                Err(e) => println!("{e}"),
            }
        }

        Ok(())
    }

    async fn dispatch(&mut self, command: ConsoleCommand) -> Result<()> {
        match command {
            ConsoleCommand::Start(first) => self.handle.start(first).await?,
            ConsoleCommand::Take(id) => self.handle.mark_turn_taken(id).await?,
            ConsoleCommand::Observe(id) => {
                let before = self.observer.session();
                self.observer.control().mark_turn_taken(id).await?;
                let replicated = self.observer.wait_for(|session| *session != before);
                match tokio::time::timeout(REPLICATION_WAIT, replicated).await {
                    Ok(result) => {
                        result?;
                    }
                    Err(_) => println!("request sent; the host did not report a change"),
                }
                print!("{}", render(&self.observer.session(), &self.oracles.as_combat_env()));
                return Ok(());
            }
            ConsoleCommand::Back => self.handle.previous_turn().await?,
            ConsoleCommand::BackRound => self.handle.previous_round().await?,
            ConsoleCommand::NextRound => self.handle.next_round().await?,
            ConsoleCommand::End => self.handle.end_combat().await?,
            ConsoleCommand::Show => {}
            ConsoleCommand::Defeat { piece, defeated } => {
                if !self.oracles.pieces().set_defeated(piece, defeated) {
                    bail!("unknown {piece}");
                }
            }
            ConsoleCommand::Dispose { piece, disposition } => {
                if !self.oracles.pieces().set_disposition(piece, disposition) {
                    bail!("unknown {piece}");
                }
            }
            ConsoleCommand::SkipDefeated(on) => self.oracles.settings().set_skip_defeated(on),
            ConsoleCommand::Help => {
                println!("{HELP}");
                return Ok(());
            }
            ConsoleCommand::Quit => return Ok(()),
        }
        self.show().await
    }

    async fn show(&self) -> Result<()> {
        let session = self.handle.query_session().await?;
        print!("{}", render(&session, &self.oracles.as_combat_env()));
        Ok(())
    }
}

/// Renders round, turn and the roster with per-combatant progress.
pub fn render(session: &CombatSession, env: &CombatEnv<'_>) -> String {
    let view = SessionView::capture(session, env);
    let mut out = String::new();

    if view.is_started() {
        let turn = view
            .turn
            .map_or_else(|| "-".to_owned(), |turn| (turn + 1).to_string());
        let acting = view
            .acting_faction
            .map_or_else(|| "nobody".to_owned(), |f| f.to_string());
        let _ = writeln!(out, "round {} | turn {} | acting: {}", view.round, turn, acting);
    } else {
        let _ = writeln!(out, "combat not started");
    }

    for combatant in session.combatants() {
        let taken = session.ledger().taken_count(view.round, combatant.id);
        let marker = if view.acting.contains(&combatant.id) {
            ">"
        } else {
            " "
        };
        let defeated = if combatant.is_defeated(env) {
            " (defeated)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{} {:<4} {:<18} {:<9} {}/{}{}",
            marker,
            combatant.id.to_string(),
            combatant.name,
            combatant.faction(env).to_string(),
            taken,
            combatant.action_budget(env),
            defeated
        );
    }
    out
}

/// Prints lifecycle events as they happen.
pub fn spawn_lifecycle_printer(handle: &RuntimeHandle) -> JoinHandle<()> {
    let mut events = handle.subscribe(Topic::Lifecycle);
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(Event::Lifecycle(event)) => println!("  * {}", describe(&event)),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    println!("  * ({skipped} events skipped)");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

fn describe(event: &LifecycleEvent) -> String {
    match event.combatant() {
        Some(combatant) => format!("{} {} (round {})", event.kind(), combatant.id, event.round()),
        None => format!("{} (round {})", event.kind(), event.round()),
    }
}
