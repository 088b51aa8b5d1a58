use indexmap::IndexMap;
use serde::Serialize;

use crate::schema::{ArgDef, FlagDef};

/// Resolved value of one flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedFlag {
    pub name: String,
    pub value: String,
    pub boolean: bool,
}

impl ParsedFlag {
    pub(crate) fn new(def: &FlagDef, value: impl Into<String>) -> Self {
        Self {
            name: def.name().to_string(),
            value: value.into(),
            boolean: def.is_boolean(),
        }
    }

    pub(crate) fn default_for(def: &FlagDef) -> Self {
        Self::new(def, def.default_value())
    }

    /// `true` only for the literal value `"true"`.
    pub fn as_bool(&self) -> bool {
        self.value == "true"
    }
}

/// Resolved value of one positional argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedArg {
    pub name: String,
    pub value: String,
    pub variadic: bool,
}

impl ParsedArg {
    pub(crate) fn new(def: &ArgDef, value: impl Into<String>) -> Self {
        Self {
            name: def.name().to_string(),
            value: value.into(),
            variadic: def.is_variadic(),
        }
    }

    pub(crate) fn default_for(def: &ArgDef) -> Self {
        Self::new(def, def.default_value())
    }

    /// Individual values of a variadic argument (comma separated).
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.value.split(',').filter(|v| !v.is_empty())
    }
}

/// Result of a successful parse. Every declared flag and argument is present,
/// in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandParsed {
    pub name: String,
    pub flags: IndexMap<String, ParsedFlag>,
    pub args: IndexMap<String, ParsedArg>,
}

impl CommandParsed {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    pub fn flags(&self) -> &IndexMap<String, ParsedFlag> {
        &self.flags
    }

    pub fn args(&self) -> &IndexMap<String, ParsedArg> {
        &self.args
    }

    pub fn flag(&self, name: &str) -> Option<&ParsedFlag> {
        self.flags.get(name)
    }

    pub fn arg(&self, name: &str) -> Option<&ParsedArg> {
        self.args.get(name)
    }

    pub fn flag_value(&self, name: &str) -> Option<&str> {
        self.flag(name).map(|f| f.value.as_str())
    }

    pub fn arg_value(&self, name: &str) -> Option<&str> {
        self.arg(name).map(|a| a.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variadic_values_split_on_commas() {
        let arg = ParsedArg {
            name: "subjects".to_string(),
            value: "math,science".to_string(),
            variadic: true,
        };
        assert_eq!(arg.values().collect::<Vec<_>>(), ["math", "science"]);

        let empty = ParsedArg {
            value: String::new(),
            ..arg
        };
        assert_eq!(empty.values().count(), 0);
    }

    #[test]
    fn as_bool_only_accepts_literal_true() {
        let flag = ParsedFlag {
            name: "verbose".to_string(),
            value: "true".to_string(),
            boolean: true,
        };
        assert!(flag.as_bool());
        assert!(
            !ParsedFlag {
                value: "yes".to_string(),
                ..flag
            }
            .as_bool()
        );
    }
}
