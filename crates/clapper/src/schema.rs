//! Command schema: positional arguments, flags and the short-alias index.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::HashMap;

/// Suffix marking a variadic argument at registration (`files...`).
pub const VARIADIC_SUFFIX: &str = "...";

/// Prefix marking an inverted boolean flag at registration (`no-clean`).
pub const INVERTED_FLAG_PREFIX: &str = "no-";

/// Allow-list of literal values. `None` means unrestricted.
pub type ValidValues = Option<IndexSet<String>>;

pub(crate) fn clean_name(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

fn valid_values<I, S>(values: I) -> ValidValues
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let set: IndexSet<String> = values.into_iter().map(Into::into).collect();
    if set.is_empty() { None } else { Some(set) }
}

fn accepts(valid: &ValidValues, value: &str) -> bool {
    valid.as_ref().is_none_or(|set| set.contains(value))
}

/// A declared positional argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgDef {
    name: String,
    default_value: String,
    variadic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    valid_values: ValidValues,
}

impl ArgDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn valid_values(&self) -> Option<&IndexSet<String>> {
        self.valid_values.as_ref()
    }

    /// Whether `value` is in the valid-value set (always true when unrestricted).
    pub fn accepts(&self, value: &str) -> bool {
        accepts(&self.valid_values, value)
    }
}

/// A declared flag.
///
/// Inverted flags are stored under their bare name (`clean` for `no-clean`)
/// and are only reachable through the `--no-` spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagDef {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    short: Option<char>,
    boolean: bool,
    inverted: bool,
    default_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    valid_values: ValidValues,
}

impl FlagDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short(&self) -> Option<char> {
        self.short
    }

    pub fn is_boolean(&self) -> bool {
        self.boolean
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn valid_values(&self) -> Option<&IndexSet<String>> {
        self.valid_values.as_ref()
    }

    pub fn accepts(&self, value: &str) -> bool {
        accepts(&self.valid_values, value)
    }
}

/// Schema of a single command. The empty name denotes the root command.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommandConfig {
    name: String,
    args: IndexMap<String, ArgDef>,
    flags: IndexMap<String, FlagDef>,
    #[serde(skip)]
    short_flags: HashMap<char, String>,
}

impl CommandConfig {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    /// Arguments in declaration order.
    pub fn args(&self) -> impl ExactSizeIterator<Item = &ArgDef> {
        self.args.values()
    }

    /// Flags in declaration order.
    pub fn flags(&self) -> impl ExactSizeIterator<Item = &FlagDef> {
        self.flags.values()
    }

    pub fn arg(&self, name: &str) -> Option<&ArgDef> {
        self.args.get(name)
    }

    pub fn flag(&self, name: &str) -> Option<&FlagDef> {
        self.flags.get(name)
    }

    /// Resolve a short alias to its flag.
    pub fn flag_by_short(&self, short: char) -> Option<&FlagDef> {
        self.short_flags
            .get(&short)
            .and_then(|long| self.flags.get(long))
    }

    pub(crate) fn arg_at(&self, index: usize) -> Option<&ArgDef> {
        self.args.get_index(index).map(|(_, def)| def)
    }

    /// Register a positional argument.
    ///
    /// A trailing `...` marks the argument variadic. Arguments without a
    /// default should come first and the variadic one last; the order is
    /// kept as given. Returns the existing definition (and `true`) when
    /// the name is already taken.
    pub fn add_arg(&mut self, name: &str, default_value: &str) -> (&ArgDef, bool) {
        self.insert_arg(name, default_value, None)
    }

    /// Like [`add_arg`](Self::add_arg), restricting accepted values.
    ///
    /// An empty `valid` list leaves the argument unrestricted.
    pub fn add_arg_with_valid<I, S>(
        &mut self,
        name: &str,
        default_value: &str,
        valid: I,
    ) -> (&ArgDef, bool)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_arg(name, default_value, valid_values(valid))
    }

    fn insert_arg(
        &mut self,
        name: &str,
        default_value: &str,
        valid_values: ValidValues,
    ) -> (&ArgDef, bool) {
        let mut name = clean_name(name);
        let mut variadic = false;
        if let Some(stripped) = name.strip_suffix(VARIADIC_SUFFIX) {
            name = stripped.to_string();
            variadic = true;
        }

        let existed = self.args.contains_key(&name);
        let def = self.args.entry(name).or_insert_with_key(|name| {
            tracing::trace!(command = %self.name, arg = %name, variadic, "registered argument");
            ArgDef {
                name: name.clone(),
                default_value: default_value.to_string(),
                variadic,
                valid_values,
            }
        });
        (def, existed)
    }

    /// Register a flag.
    ///
    /// `short` is reduced to its first character; empty means no alias.
    /// A `no-` prefixed name registers an inverted flag under the bare
    /// name: boolean, default `"true"`, no alias. Other boolean flags
    /// default to `"false"` whatever `default_value` says. Returns the
    /// existing definition (and `true`) when the long name is taken.
    pub fn add_flag(
        &mut self,
        name: &str,
        short: &str,
        boolean: bool,
        default_value: &str,
    ) -> (&FlagDef, bool) {
        self.insert_flag(name, short, boolean, default_value, None)
    }

    /// Like [`add_flag`](Self::add_flag), restricting accepted values.
    ///
    /// Boolean flags never consult the set.
    pub fn add_flag_with_valid<I, S>(
        &mut self,
        name: &str,
        short: &str,
        boolean: bool,
        default_value: &str,
        valid: I,
    ) -> (&FlagDef, bool)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_flag(name, short, boolean, default_value, valid_values(valid))
    }

    fn insert_flag(
        &mut self,
        name: &str,
        short: &str,
        boolean: bool,
        default_value: &str,
        valid_values: ValidValues,
    ) -> (&FlagDef, bool) {
        let name = clean_name(name);
        let mut short = short.chars().find(|c| !c.is_whitespace());

        let (name, boolean, inverted, default_value) =
            if let Some(bare) = name.strip_prefix(INVERTED_FLAG_PREFIX) {
                short = None;
                (bare.to_string(), true, true, "true".to_string())
            } else if boolean {
                (name, true, false, "false".to_string())
            } else {
                (name, false, false, default_value.to_string())
            };

        if self.flags.contains_key(&name) {
            return (&self.flags[&name], true);
        }

        if let Some(c) = short {
            if let Some(owner) = self.short_flags.get(&c) {
                tracing::warn!(
                    command = %self.name,
                    flag = %name,
                    short = %c,
                    owner = %owner,
                    "short alias already taken, registering flag without it"
                );
                short = None;
            } else {
                self.short_flags.insert(c, name.clone());
            }
        }

        tracing::trace!(command = %self.name, flag = %name, boolean, inverted, "registered flag");
        let def = self.flags.entry(name).or_insert_with_key(|name| FlagDef {
            name: name.clone(),
            short,
            boolean,
            inverted,
            default_value,
            valid_values,
        });
        (def, false)
    }
}
