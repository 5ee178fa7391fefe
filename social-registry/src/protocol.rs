//! Console command parsing for the interactive shell.
//!
//! Turns a line of user input (like `ADD ana 95`) into a [`ConsoleCommand`].
//! Executing the command against a registry is the job of
//! [`crate::console`].

use anyhow::{anyhow, bail, Context, Result};

use crate::error::validate_score;

/// Commands accepted at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    Add { name: String, score: u32 },
    Get { name: String },
    /// Bounds may be negative or exceed the score range; they are clamped
    /// when the command runs.
    Range { min: i64, max: i64 },
    Score { score: u32 },
    Count,
    Request { requester: String, target: String },
    Next,
    Pending,
    Undo,
    History { limit: Option<usize> },
    Connect { a: String, b: String },
    Neighbors { name: String },
    Distance { origin: String, destination: String },
    Level4,
    Depth { depth: usize },
    Snapshot,
    Help,
    Exit,
}

pub const HELP: &str = "\
Commands (case-insensitive, aliases in parentheses):
  ADD (a) <name> <score>        create a client
  GET (g) <name>                show one client
  RANGE <min> <max>             clients scoring in [min, max]
  SCORE <score>                 clients with exactly this score
  COUNT                         number of clients
  REQUEST (r) <from> <to>       queue a follow request
  NEXT (n)                      deliver and confirm the oldest request
  PENDING                       list queued requests
  UNDO (u)                      reverse the last add or request
  HISTORY [limit]               recent undoable actions
  CONNECT (c) <a> <b>           connect two clients
  NEIGHBORS <name>              direct connections
  DISTANCE (d) <a> <b>          hops between two clients
  LEVEL4                        score-tree depth 4, most followed first
  DEPTH <n>                     clients at score-tree depth n
  SNAPSHOT (s)                  full state as JSON
  HELP (h) / EXIT (e)";

impl ConsoleCommand {
    /// Parses one line of input.
    pub fn parse(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = parts.first() else {
            bail!("empty command");
        };

        let cmd = first.to_uppercase();
        let normalized = match cmd.as_str() {
            "A" => "ADD",
            "G" => "GET",
            "R" => "REQUEST",
            "N" => "NEXT",
            "U" => "UNDO",
            "C" => "CONNECT",
            "D" => "DISTANCE",
            "S" => "SNAPSHOT",
            "H" => "HELP",
            "E" | "QUIT" => "EXIT",
            other => other,
        };
        let args = &parts[1..];

        let command = match (normalized, args) {
            ("ADD", [name, score]) => ConsoleCommand::Add {
                name: name.to_string(),
                score: parse_score(name, score)?,
            },
            ("GET", [name]) => ConsoleCommand::Get {
                name: name.to_string(),
            },
            ("RANGE", [min, max]) => ConsoleCommand::Range {
                min: parse_bound(min)?,
                max: parse_bound(max)?,
            },
            ("SCORE", [score]) => ConsoleCommand::Score {
                score: parse_score("SCORE", score)?,
            },
            ("COUNT", []) => ConsoleCommand::Count,
            ("REQUEST", [requester, target]) => ConsoleCommand::Request {
                requester: requester.to_string(),
                target: target.to_string(),
            },
            ("NEXT", []) => ConsoleCommand::Next,
            ("PENDING", []) => ConsoleCommand::Pending,
            ("UNDO", []) => ConsoleCommand::Undo,
            ("HISTORY", []) => ConsoleCommand::History { limit: None },
            ("HISTORY", [limit]) => ConsoleCommand::History {
                limit: Some(
                    limit
                        .parse()
                        .with_context(|| format!("invalid history limit '{limit}'"))?,
                ),
            },
            ("CONNECT", [a, b]) => ConsoleCommand::Connect {
                a: a.to_string(),
                b: b.to_string(),
            },
            ("NEIGHBORS", [name]) => ConsoleCommand::Neighbors {
                name: name.to_string(),
            },
            ("DISTANCE", [origin, destination]) => ConsoleCommand::Distance {
                origin: origin.to_string(),
                destination: destination.to_string(),
            },
            ("LEVEL4", []) => ConsoleCommand::Level4,
            ("DEPTH", [depth]) => ConsoleCommand::Depth {
                depth: depth
                    .parse()
                    .with_context(|| format!("invalid depth '{depth}'"))?,
            },
            ("SNAPSHOT", []) => ConsoleCommand::Snapshot,
            ("HELP", []) => ConsoleCommand::Help,
            ("EXIT", []) => ConsoleCommand::Exit,
            (
                "ADD" | "GET" | "RANGE" | "SCORE" | "COUNT" | "REQUEST" | "NEXT" | "PENDING"
                | "UNDO" | "HISTORY" | "CONNECT" | "NEIGHBORS" | "DISTANCE" | "LEVEL4" | "DEPTH"
                | "SNAPSHOT" | "HELP" | "EXIT",
                _,
            ) => return Err(anyhow!("wrong number of arguments for {normalized}; try HELP")),
            _ => return Err(anyhow!("unknown command '{first}'; try HELP")),
        };
        Ok(command)
    }
}

fn parse_score(name: &str, raw: &str) -> Result<u32> {
    let value: i64 = raw
        .parse()
        .with_context(|| format!("invalid score '{raw}'"))?;
    Ok(validate_score(name, value)?)
}

fn parse_bound(raw: &str) -> Result<i64> {
    raw.parse()
        .with_context(|| format!("invalid range bound '{raw}'"))
}
