//! Token classification and `--flag=value` expansion.
//!
//! Lengths are counted in characters, so `-é` is a short flag.

/// Prefix that addresses an inverted boolean flag.
pub const INVERTED_PREFIX: &str = "--no-";

/// Whether `token` looks like a flag: at least two characters, leading dash.
pub fn is_flag(token: &str) -> bool {
    token.starts_with('-') && token.chars().nth(1).is_some()
}

/// Whether `token` is a short flag (`-x`).
pub fn is_short_flag(token: &str) -> bool {
    is_flag(token) && token.chars().count() == 2 && !token.starts_with("--")
}

/// Name addressed by an inverted-flag token, `--no-clean` => `clean`.
pub fn inverted_name(token: &str) -> Option<&str> {
    if is_flag(token) {
        token.strip_prefix(INVERTED_PREFIX)
    } else {
        None
    }
}

/// Whether a flag-shaped token has a malformed dash structure.
///
/// Two-character tokens must start with exactly one dash; longer tokens
/// must start with exactly two.
pub fn is_unsupported_flag(token: &str) -> bool {
    match token.chars().count() {
        0 | 1 => false,
        2 => !token.starts_with('-') || token.starts_with("--"),
        _ => !token.starts_with("--") || token.starts_with("---"),
    }
}

/// Expand `--name=value` / `-x=value` forms into separate tokens.
///
/// Only flag-shaped tokens are split; empty segments and empty tokens are
/// dropped. Positional tokens pass through untouched.
pub fn normalize<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        let token = token.as_ref();
        if is_flag(token) {
            out.extend(
                token
                    .split('=')
                    .filter(|part| !part.trim().is_empty())
                    .map(str::to_string),
            );
        } else if !token.is_empty() {
            out.push(token.to_string());
        }
    }
    out
}

/// First malformed flag in `tokens`, if any.
pub fn find_unsupported<S: AsRef<str>>(tokens: &[S]) -> Option<&str> {
    tokens
        .iter()
        .map(AsRef::as_ref)
        .find(|token| is_flag(token) && is_unsupported_flag(token))
}
