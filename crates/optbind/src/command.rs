//! Sub-command dispatch with explicit registration.
//!
//! Commands are registered by name at startup; the first non-option token
//! of the argument list selects one, and the remaining tokens are handed to
//! its handler.

use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("no command given")]
    Missing,

    #[error("unknown command: {0}")]
    Unknown(String),
}

/// Index of the first token that is neither an option nor a response file.
pub fn find_command_token<S: AsRef<str>>(args: &[S]) -> Option<usize> {
    args.iter().position(|a| {
        let a = a.as_ref();
        !a.starts_with('-') && !a.starts_with('@')
    })
}

/// Split the command token out of `args`, keeping everything else in order.
pub fn strip_command<S: AsRef<str>>(args: &[S]) -> Option<(String, Vec<String>)> {
    let index = find_command_token(args)?;
    let command = args[index].as_ref().to_string();
    let rest = args
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, a)| a.as_ref().to_string())
        .collect();
    Some((command, rest))
}

type Handler<R> = Box<dyn Fn(Vec<String>) -> R>;

struct Entry<R> {
    description: String,
    handler: Handler<R>,
}

/// Named commands, each producing an `R` when run.
pub struct CommandRegistry<R> {
    commands: BTreeMap<String, Entry<R>>,
}

impl<R> Default for CommandRegistry<R> {
    fn default() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }
}

impl<R> CommandRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`. A later registration replaces an
    /// earlier one with the same name.
    pub fn register<F>(&mut self, name: &str, description: &str, handler: F) -> &mut Self
    where
        F: Fn(Vec<String>) -> R + 'static,
    {
        self.commands.insert(
            name.trim().to_string(),
            Entry {
                description: description.to_string(),
                handler: Box::new(handler),
            },
        );
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// `(name, description)` pairs sorted by name.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &str)> {
        self.commands
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.description.as_str()))
    }

    /// Run the command named by the first non-option token.
    pub fn dispatch<S: AsRef<str>>(&self, args: &[S]) -> Result<R, CommandError> {
        let (name, rest) = strip_command(args).ok_or(CommandError::Missing)?;
        let entry = self
            .commands
            .get(&name)
            .ok_or_else(|| CommandError::Unknown(name.clone()))?;
        debug!(command = %name, args = rest.len(), "dispatching");
        Ok((entry.handler)(rest))
    }

    /// One line per command, names padded to a common width.
    pub fn overview(&self) -> Vec<String> {
        let width = self.commands.keys().map(|n| n.chars().count()).max().unwrap_or(0);
        self.commands()
            .map(|(name, description)| {
                format!(" {name:width$}  {description}").trim_end().to_string()
            })
            .collect()
    }
}
