//! Executes parsed console commands against a registry and renders the
//! results as text.

use anyhow::{Context, Result};

use crate::client::Client;
use crate::protocol::{ConsoleCommand, HELP};
use crate::registry::SocialRegistry;

/// What the shell should do after a command ran.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Exit,
}

pub struct Console {
    registry: SocialRegistry,
    history_limit: usize,
}

impl Console {
    pub fn new(registry: SocialRegistry, history_limit: usize) -> Self {
        Self {
            registry,
            history_limit,
        }
    }

    pub fn registry(&self) -> &SocialRegistry {
        &self.registry
    }

    /// Parses and runs one line of input.
    pub fn run_line(&mut self, line: &str) -> Result<Outcome> {
        let command = ConsoleCommand::parse(line)?;
        self.execute(command)
    }

    pub fn execute(&mut self, command: ConsoleCommand) -> Result<Outcome> {
        let registry = &mut self.registry;
        let output = match command {
            ConsoleCommand::Add { name, score } => {
                registry.add_client(&name, score)?;
                format!("added {name} (score {score}); {} clients", registry.count())
            }
            ConsoleCommand::Get { name } => match registry.client(&name) {
                Some(client) => describe(client),
                None => format!("no client named '{name}'"),
            },
            ConsoleCommand::Range { min, max } => {
                if max < 0 || min > max {
                    list(&[])
                } else {
                    let min = u32::try_from(min.max(0)).unwrap_or(u32::MAX);
                    let max = u32::try_from(max).unwrap_or(u32::MAX);
                    list(&registry.clients_in_range(min, max))
                }
            }
            ConsoleCommand::Score { score } => list(&registry.clients_with_score(score)),
            ConsoleCommand::Count => format!("{} clients", registry.count()),
            ConsoleCommand::Request { requester, target } => {
                registry.request_follow(&requester, &target)?;
                format!(
                    "queued {requester} -> {target}; {} pending",
                    registry.pending_count()
                )
            }
            ConsoleCommand::Next => match registry.process_next_request() {
                None => "no pending requests".to_string(),
                Some(request) => {
                    registry
                        .confirm_follow(&request.requester, &request.target)
                        .with_context(|| format!("request {request} was dropped"))?;
                    format!("{request} confirmed")
                }
            },
            ConsoleCommand::Pending => {
                let header = format!("{} pending", registry.pending_count());
                std::iter::once(header)
                    .chain(registry.pending_requests().map(|request| format!("  {request}")))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            ConsoleCommand::Undo => match registry.undo()? {
                Some(action) => format!("undone: {} {}", action.label(), action.detail),
                None => "nothing to undo".to_string(),
            },
            ConsoleCommand::History { limit } => {
                let actions = registry.history(limit.unwrap_or(self.history_limit));
                if actions.is_empty() {
                    "history is empty".to_string()
                } else {
                    actions
                        .iter()
                        .map(|action| action.to_string())
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            ConsoleCommand::Connect { a, b } => {
                if registry.connect(&a, &b)? {
                    format!("connected {a} <-> {b}")
                } else {
                    format!("{a} and {b} were already connected")
                }
            }
            ConsoleCommand::Neighbors { name } => {
                let neighbors = registry.neighbors(&name)?;
                if neighbors.is_empty() {
                    format!("{name} has no connections")
                } else {
                    neighbors.iter().cloned().collect::<Vec<_>>().join(", ")
                }
            }
            ConsoleCommand::Distance {
                origin,
                destination,
            } => match registry.distance(&origin, &destination)? {
                Some(hops) => format!("{origin} -> {destination}: {hops} hops"),
                None => format!("{origin} and {destination} are not connected"),
            },
            ConsoleCommand::Level4 => list(&registry.level_four_by_followers()),
            ConsoleCommand::Depth { depth } => list(&registry.clients_at_depth(depth)),
            ConsoleCommand::Snapshot => serde_json::to_string_pretty(&registry.snapshot())
                .context("failed to render snapshot")?,
            ConsoleCommand::Help => HELP.to_string(),
            ConsoleCommand::Exit => return Ok(Outcome::Exit),
        };
        Ok(Outcome::Continue(output))
    }
}

fn describe(client: &Client) -> String {
    format!(
        "{} score={} followers={} following=[{}] connections=[{}]",
        client.name(),
        client.score(),
        client.followers(),
        join(client.following().iter()),
        join(client.connections().iter()),
    )
}

fn list(clients: &[&Client]) -> String {
    if clients.is_empty() {
        return "(no clients)".to_string();
    }
    clients
        .iter()
        .map(|client| {
            format!(
                "{} (score {}, {} followers)",
                client.name(),
                client.score(),
                client.followers()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn join<'a>(names: impl Iterator<Item = &'a String>) -> String {
    names.map(String::as_str).collect::<Vec<_>>().join(", ")
}
