//! Single forward pass matching tokens to a command's flags and arguments.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::parsed::{CommandParsed, ParsedArg, ParsedFlag};
use crate::schema::{ArgDef, CommandConfig, FlagDef};
use crate::token::{inverted_name, is_flag, is_short_flag};

/// Resolve normalised `tokens` (command name already consumed) against `config`.
pub(crate) fn resolve(config: &CommandConfig, tokens: Vec<String>) -> Result<CommandParsed> {
    let mut flags: HashMap<String, String> = HashMap::new();
    let mut slots: Vec<Option<String>> = vec![None; config.args().len()];

    let mut tokens = tokens.into_iter().peekable();
    while let Some(token) = tokens.next() {
        if !is_flag(&token) {
            assign_positional(config, &mut slots, token)?;
            continue;
        }

        let def = lookup_flag(config, &token)?;
        let value = if def.is_boolean() {
            Some(if def.is_inverted() { "false" } else { "true" }.to_string())
        } else {
            // Only a following non-flag token can be a value.
            match tokens.next_if(|next| !is_flag(next)) {
                Some(value) if !def.accepts(&value) => {
                    return Err(Error::unsupported_value(def.name(), value));
                }
                value => value,
            }
        };

        match value {
            Some(value) => {
                tracing::trace!(flag = %def.name(), %value, "assigned flag");
                flags.insert(def.name().to_string(), value);
            }
            None => tracing::trace!(flag = %def.name(), "flag without value, default applies"),
        }
    }

    Ok(CommandParsed {
        name: config.name().to_string(),
        flags: config
            .flags()
            .map(|def| {
                let parsed = match flags.remove(def.name()) {
                    Some(value) => ParsedFlag::new(def, value),
                    None => ParsedFlag::default_for(def),
                };
                (def.name().to_string(), parsed)
            })
            .collect(),
        args: config
            .args()
            .zip(slots)
            .map(|(def, slot)| {
                let parsed = match slot {
                    Some(value) => ParsedArg::new(def, value),
                    None => ParsedArg::default_for(def),
                };
                (def.name().to_string(), parsed)
            })
            .collect(),
    })
}

fn lookup_flag<'c>(config: &'c CommandConfig, token: &str) -> Result<&'c FlagDef> {
    let found = if is_short_flag(token) {
        token.chars().nth(1).and_then(|c| config.flag_by_short(c))
    } else if let Some(name) = inverted_name(token) {
        config.flag(name).filter(|def| def.is_inverted())
    } else {
        config
            .flag(token.trim_start_matches('-'))
            .filter(|def| !def.is_inverted())
    };
    found.ok_or_else(|| Error::unknown_flag(token))
}

fn check_arg(def: &ArgDef, value: &str) -> Result<()> {
    if def.accepts(value) {
        Ok(())
    } else {
        Err(Error::unsupported_value(def.name(), value))
    }
}

/// Store `value` in the first unset slot, or append it to a filled
/// variadic final slot. Values with nowhere to go are dropped.
fn assign_positional(
    config: &CommandConfig,
    slots: &mut [Option<String>],
    value: String,
) -> Result<()> {
    let last = slots.len().saturating_sub(1);
    for (index, slot) in slots.iter_mut().enumerate() {
        let Some(def) = config.arg_at(index) else {
            break;
        };
        match slot {
            None => {
                check_arg(def, &value)?;
                tracing::trace!(arg = %def.name(), %value, "assigned argument");
                *slot = Some(value);
                return Ok(());
            }
            Some(existing) if index == last && def.is_variadic() => {
                check_arg(def, &value)?;
                tracing::trace!(arg = %def.name(), %value, "appended to variadic argument");
                existing.push(',');
                existing.push_str(&value);
                return Ok(());
            }
            Some(_) => {}
        }
    }

    tracing::debug!(command = %config.name(), %value, "no argument slot left, dropping value");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn info() -> CommandConfig {
        let mut cmd = CommandConfig::new("info".to_string());
        cmd.add_arg_with_valid("category", "manager", ["manager", "student"]);
        cmd.add_arg("username", "");
        cmd.add_arg("subjects...", "");
        cmd.add_flag("verbose", "v", true, "");
        cmd.add_flag("version", "V", false, "1.0.1");
        cmd.add_flag("output", "o", false, "./");
        cmd.add_flag("no-clean", "", true, "");
        cmd
    }

    #[test]
    fn empty_input_yields_defaults() {
        let parsed = resolve(&info(), Vec::new()).unwrap();
        assert_eq!(parsed.name(), "info");
        assert_eq!(parsed.arg_value("category"), Some("manager"));
        assert_eq!(parsed.arg_value("subjects"), Some(""));
        assert_eq!(parsed.flag_value("verbose"), Some("false"));
        assert_eq!(parsed.flag_value("version"), Some("1.0.1"));
        assert_eq!(parsed.flag_value("clean"), Some("true"));
        assert!(parsed.arg("subjects").unwrap().variadic);
        assert!(parsed.flag("verbose").unwrap().boolean);
    }

    #[test]
    fn results_follow_declaration_order() {
        let parsed = resolve(&info(), tokens(&["--output", "x", "-v"])).unwrap();
        let flags: Vec<_> = parsed.flags().keys().map(String::as_str).collect();
        assert_eq!(flags, ["verbose", "version", "output", "clean"]);
        let args: Vec<_> = parsed.args().keys().map(String::as_str).collect();
        assert_eq!(args, ["category", "username", "subjects"]);
    }

    #[test]
    fn value_flag_does_not_consume_a_flag() {
        let parsed = resolve(&info(), tokens(&["-V", "-v"])).unwrap();
        assert_eq!(parsed.flag_value("version"), Some("1.0.1"));
        assert_eq!(parsed.flag_value("verbose"), Some("true"));
    }

    #[test]
    fn value_flag_at_end_keeps_default() {
        let parsed = resolve(&info(), tokens(&["--output"])).unwrap();
        assert_eq!(parsed.flag_value("output"), Some("./"));
    }

    #[test]
    fn boolean_flag_leaves_next_token_positional() {
        let parsed = resolve(&info(), tokens(&["--verbose", "student"])).unwrap();
        assert_eq!(parsed.flag_value("verbose"), Some("true"));
        assert_eq!(parsed.arg_value("category"), Some("student"));
    }

    #[test]
    fn inverted_flag_only_through_no_spelling() {
        let parsed = resolve(&info(), tokens(&["--no-clean"])).unwrap();
        assert_eq!(parsed.flag_value("clean"), Some("false"));

        let err = resolve(&info(), tokens(&["--clean"])).unwrap_err();
        assert_eq!(err, Error::unknown_flag("--clean"));

        let err = resolve(&info(), tokens(&["--no-verbose"])).unwrap_err();
        assert_eq!(err, Error::unknown_flag("--no-verbose"));
    }

    #[test]
    fn unknown_short_flag() {
        let err = resolve(&info(), tokens(&["-d", "./x"])).unwrap_err();
        assert_eq!(err, Error::unknown_flag("-d"));
    }

    #[test]
    fn variadic_accumulates_in_order() {
        let parsed = resolve(
            &info(),
            tokens(&["student", "jane", "math", "-v", "science", "physics"]),
        )
        .unwrap();
        assert_eq!(parsed.arg_value("username"), Some("jane"));
        assert_eq!(parsed.arg_value("subjects"), Some("math,science,physics"));
    }

    #[test]
    fn extra_positionals_are_dropped_without_variadic() {
        let mut cmd = CommandConfig::new(String::new());
        cmd.add_arg("output", "");
        let parsed = resolve(&cmd, tokens(&["a", "b", "c"])).unwrap();
        assert_eq!(parsed.arg_value("output"), Some("a"));
        assert_eq!(parsed.args().len(), 1);
    }

    #[test]
    fn positionals_without_declared_args_are_ignored() {
        let cmd = CommandConfig::new("ghost".to_string());
        let parsed = resolve(&cmd, tokens(&["a", "b"])).unwrap();
        assert!(parsed.args().is_empty());
    }

    #[test]
    fn valid_values_checked_for_args_and_flags() {
        let err = resolve(&info(), tokens(&["worker"])).unwrap_err();
        assert_eq!(err, Error::unsupported_value("category", "worker"));

        let mut cmd = info();
        cmd.add_flag_with_valid("format", "f", false, "plain", ["plain", "json"]);
        let err = resolve(&cmd, tokens(&["student", "-f", "xml"])).unwrap_err();
        assert_eq!(err, Error::unsupported_value("format", "xml"));

        let parsed = resolve(&cmd, tokens(&["--format", "json"])).unwrap();
        assert_eq!(parsed.flag_value("format"), Some("json"));
    }

    #[test]
    fn valid_values_apply_to_every_variadic_value() {
        let mut cmd = CommandConfig::new(String::new());
        cmd.add_arg_with_valid("langs...", "", ["rust", "go"]);
        let parsed = resolve(&cmd, tokens(&["rust", "go"])).unwrap();
        assert_eq!(parsed.arg_value("langs"), Some("rust,go"));

        let err = resolve(&cmd, tokens(&["rust", "java"])).unwrap_err();
        assert_eq!(err, Error::unsupported_value("langs", "java"));
    }

    #[test]
    fn filled_slot_does_not_validate_later_values() {
        let mut cmd = CommandConfig::new(String::new());
        cmd.add_arg_with_valid("category", "", ["student"]);
        cmd.add_arg("username", "");
        let parsed = resolve(&cmd, tokens(&["student", "jane"])).unwrap();
        assert_eq!(parsed.arg_value("username"), Some("jane"));
    }

    #[test]
    fn last_flag_value_wins() {
        let parsed = resolve(&info(), tokens(&["-o", "a", "--output", "b"])).unwrap();
        assert_eq!(parsed.flag_value("output"), Some("b"));
    }
}
