//! `.env` file parsing and rendering
//!
//! Supports the common subset of the dotenv format:
//!
//! ```text
//! # comment
//! export API_KEY=abc123
//! DB_URL="postgres://x"   # trailing comment
//! GREETING='hello world'
//! MULTI="line one\nline two"
//! ```
//!
//! Quoted values must close on the same line.

use zeroize::Zeroizing;

use crate::error::{KeyvaultError, KeyvaultResult};
use crate::models::SecretBundle;

/// Parse `.env` text into a bundle
///
/// Lines without `=` or with an empty key are skipped. A repeated key keeps
/// the position of its first occurrence and the value of its last.
pub fn parse(text: &str) -> KeyvaultResult<SecretBundle> {
    let mut bundle = SecretBundle::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line
            .strip_prefix("export ")
            .map(str::trim_start)
            .unwrap_or(line);

        let Some((key, value)) = line.split_once('=') else {
            tracing::debug!(line = index + 1, "skipping .env line without '='");
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            tracing::debug!(line = index + 1, "skipping .env line with empty key");
            continue;
        }

        bundle.insert(key, parse_value(value.trim()))?;
    }

    Ok(bundle)
}

fn parse_value(value: &str) -> String {
    if let Some(quote) = value.chars().next().filter(|c| *c == '"' || *c == '\'') {
        if let Some(end) = value[1..].rfind(quote).map(|i| i + 1) {
            let rest = value[end + 1..].trim_start();
            if rest.is_empty() || rest.starts_with('#') {
                let inner = &value[1..end];
                return if quote == '"' {
                    unescape(inner)
                } else {
                    inner.to_string()
                };
            }
        }
    }

    strip_inline_comment(value).to_string()
}

fn strip_inline_comment(value: &str) -> &str {
    if value.starts_with('#') {
        return "";
    }
    let cut = value
        .char_indices()
        .zip(value.chars().skip(1))
        .find(|((_, c), next)| c.is_whitespace() && *next == '#')
        .map(|((i, _), _)| i);
    match cut {
        Some(i) => value[..i].trim_end(),
        None => value,
    }
}

fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Render a bundle as `KEY=VALUE` lines joined by `\n`
///
/// Values that would not survive [`parse`] unquoted are double-quoted and
/// escaped. Keys cannot be quoted, so a key that [`parse`] would drop or
/// change is a `Validation` error and nothing is rendered.
pub fn render(bundle: &SecretBundle) -> KeyvaultResult<Zeroizing<String>> {
    if let Some(key) = bundle.keys().find(|key| !is_renderable_key(key)) {
        return Err(KeyvaultError::Validation(format!(
            "Secret key {:?} cannot be written to a .env file",
            key
        )));
    }

    let mut out = Zeroizing::new(String::new());
    for (index, (key, value)) in bundle.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(key);
        out.push('=');
        if needs_quotes(value) {
            out.push('"');
            for c in value.chars() {
                match c {
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\t' => out.push_str("\\t"),
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    c => out.push(c),
                }
            }
            out.push('"');
        } else {
            out.push_str(value);
        }
    }
    Ok(out)
}

/// `export FOO` is covered by the whitespace rule
fn is_renderable_key(key: &str) -> bool {
    !key.is_empty()
        && !key
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '=' | '#'))
}

fn needs_quotes(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\''))
}
