use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::parsed::CommandParsed;
use crate::resolver;
use crate::schema::{CommandConfig, clean_name};
use crate::token;

/// Name of the root command.
pub const ROOT: &str = "";

/// Commands known to the parser, keyed by name.
///
/// Build it once, then call [`parse`](Self::parse) as often as needed;
/// parsing only reads the registry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Registry {
    commands: IndexMap<String, CommandConfig>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, or return the one already registered under `name`.
    ///
    /// The flag is `true` when the command already existed. An empty name
    /// registers the root command.
    pub fn register(&mut self, name: &str) -> (&mut CommandConfig, bool) {
        let name = clean_name(name);
        let existed = self.commands.contains_key(&name);
        let config = self
            .commands
            .entry(name)
            .or_insert_with_key(|name| CommandConfig::new(name.clone()));
        (config, existed)
    }

    pub fn get(&self, name: &str) -> Option<&CommandConfig> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn root(&self) -> Option<&CommandConfig> {
        self.get(ROOT)
    }

    /// Commands in registration order.
    pub fn commands(&self) -> impl ExactSizeIterator<Item = &CommandConfig> {
        self.commands.values()
    }

    /// Resolve `tokens` (program name excluded) into a fully defaulted result.
    ///
    /// Malformed flags are rejected before anything is looked up. The root
    /// command is picked when it exists and the input is empty, starts
    /// with a flag, or starts with something that is not a command name
    /// while the root takes positional arguments. Otherwise the first
    /// token names the command.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<CommandParsed> {
        if let Some(bad) = token::find_unsupported(&token::normalize(tokens)) {
            return Err(Error::unsupported_flag(bad));
        }

        let (name, rest) = match tokens.split_first() {
            Some((first, rest)) if !self.selects_root(tokens) => (first.as_ref(), rest),
            _ => (ROOT, tokens),
        };

        let config = self
            .get(name)
            .ok_or_else(|| Error::unknown_command(name))?;
        tracing::trace!(command = %name, tokens = rest.len(), "selected command");

        resolver::resolve(config, token::normalize(rest))
    }

    fn selects_root<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        let Some(root) = self.root() else {
            return false;
        };
        match tokens.first().map(AsRef::as_ref) {
            None => true,
            Some(first) if token::is_flag(first) => true,
            Some(first) => !self.contains(first) && root.args().next().is_some(),
        }
    }
}
