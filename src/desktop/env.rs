//! Session environment for child processes.
//!
//! When audamo is started from a systemd user unit its own environment often
//! lacks the variables `gsettings` and user scripts rely on (for example
//! `DBUS_SESSION_BUS_ADDRESS` or `WAYLAND_DISPLAY`). The systemd user manager
//! knows them, so they are merged in once at startup.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;
use std::process::Command;
use std::sync::OnceLock;

use tracing::debug;

static SESSION_ENV: OnceLock<HashMap<String, String>> = OnceLock::new();

/// Capture the session environment. Call once at startup.
///
/// Variables already set in the process environment win over the values
/// reported by the systemd user manager.
pub fn capture_session_environment() {
    SESSION_ENV.get_or_init(|| {
        let mut env: HashMap<String, String> = std::env::vars().collect();

        if let Some(systemd_env) = read_systemd_user_environment() {
            let before = env.len();
            for (key, value) in systemd_env {
                env.entry(key).or_insert(value);
            }
            debug!(
                added = env.len() - before,
                "Merged systemd user environment"
            );
        }

        env
    });
}

/// Environment to pass to spawned commands.
pub fn session_environment() -> &'static HashMap<String, String> {
    SESSION_ENV.get_or_init(|| std::env::vars().collect())
}

fn read_systemd_user_environment() -> Option<HashMap<String, String>> {
    let output = Command::new("systemctl")
        .args(["--user", "show-environment"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    Some(parse_environment_block(&String::from_utf8_lossy(
        &output.stdout,
    )))
}

/// Parse `KEY=value` lines as printed by `systemctl --user show-environment`.
fn parse_environment_block(block: &str) -> HashMap<String, String> {
    block
        .lines()
        .filter_map(|line| line.split_once('='))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), unquote_value(value)))
        .collect()
}

/// Undo the quoting systemd applies to values with special characters.
///
/// Values come back either plain, in single or double quotes, or in ANSI-C
/// `$'...'` form with backslash escapes.
fn unquote_value(value: &str) -> String {
    if let Some(inner) = value
        .strip_prefix("$'")
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return unescape_ansi_c(inner);
    }

    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }

    value.to_string()
}

/// Decode the backslash escapes of a `$'...'` string.
fn unescape_ansi_c(s: &str) -> String {
    let mut bytes = Vec::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        match chars.next() {
            Some('a') => bytes.push(0x07),
            Some('b') => bytes.push(0x08),
            Some('e') => bytes.push(0x1b),
            Some('f') => bytes.push(0x0c),
            Some('n') => bytes.push(b'\n'),
            Some('r') => bytes.push(b'\r'),
            Some('t') => bytes.push(b'\t'),
            Some('v') => bytes.push(0x0b),
            Some('x') => {
                let digits = take_digits(&mut chars, 16, 2);
                match u8::from_str_radix(&digits, 16) {
                    Ok(byte) => bytes.push(byte),
                    Err(_) => bytes.extend_from_slice(b"\\x"),
                }
            }
            Some(d @ '0'..='7') => {
                let digits = format!("{d}{}", take_digits(&mut chars, 8, 2));
                // Octal escapes above \377 wrap like in bash
                let value = u32::from_str_radix(&digits, 8).unwrap_or(0);
                bytes.push((value & 0xff) as u8);
            }
            Some(other) => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => bytes.push(b'\\'),
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

/// Consume up to `max` digits of the given radix.
fn take_digits(chars: &mut Peekable<Chars<'_>>, radix: u32, max: usize) -> String {
    let mut digits = String::new();
    while digits.len() < max
        && let Some(&c) = chars.peek()
        && c.is_digit(radix)
    {
        digits.push(c);
        chars.next();
    }
    digits
}
