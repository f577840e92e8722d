//! Two-phase text building with opaque placeholder tokens.
//!
//! A payload is first produced with random tokens standing in for values a
//! serializer would mangle (snippet syntax, raw JSON fragments), then every
//! token is swapped for its value with literal substitution.

use std::collections::HashMap;

use ulid::Ulid;

const TOKEN_LEN: usize = 12;
const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

struct Substitution {
    value: String,
    quoted: bool,
}

/// Issues placeholder tokens and later replaces them with their values.
#[derive(Default)]
pub struct TokenSubstituter {
    substitutions: HashMap<String, Substitution>,
}

impl TokenSubstituter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a fresh token that [`resolve`](Self::resolve) will turn into
    /// `value`.
    ///
    /// With `quoted`, the token is expected between double quotes in the
    /// payload, as a JSON serializer writes a string, and the quotes go
    /// away with it.
    pub fn reserve(&mut self, value: impl Into<String>, quoted: bool) -> String {
        let value = value.into();
        let token = loop {
            let candidate = random_token();
            let clashes = self.substitutions.contains_key(&candidate)
                || value.contains(&candidate)
                || self
                    .substitutions
                    .values()
                    .any(|existing| existing.value.contains(&candidate));
            if !clashes {
                break candidate;
            }
        };

        self.substitutions
            .insert(token.clone(), Substitution { value, quoted });
        token
    }

    pub fn len(&self) -> usize {
        self.substitutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substitutions.is_empty()
    }

    /// Replace every reserved token in `payload` with its value.
    ///
    /// A single left-to-right scan: inserted values are never scanned again,
    /// so they come out verbatim even when they contain `$`, backslashes,
    /// quotes or another token.
    pub fn resolve(&self, payload: &str) -> String {
        if self.substitutions.is_empty() || payload.len() < TOKEN_LEN {
            return payload.to_string();
        }

        let bytes = payload.as_bytes();
        let mut out = String::with_capacity(payload.len());
        let mut copied_up_to = 0;
        let mut i = 0;

        while i + TOKEN_LEN <= bytes.len() {
            let Some(substitution) = payload
                .get(i..i + TOKEN_LEN)
                .and_then(|window| self.substitutions.get(window))
            else {
                i += 1;
                continue;
            };

            let (start, end) = if substitution.quoted {
                let opened = i > 0 && bytes[i - 1] == b'"';
                let closed = bytes.get(i + TOKEN_LEN) == Some(&b'"');
                if opened && closed {
                    (i - 1, i + TOKEN_LEN + 1)
                } else {
                    i += 1;
                    continue;
                }
            } else {
                (i, i + TOKEN_LEN)
            };

            if start < copied_up_to {
                i += 1;
                continue;
            }
            out.push_str(&payload[copied_up_to..start]);
            out.push_str(&substitution.value);
            copied_up_to = end;
            i = end;
        }

        out.push_str(&payload[copied_up_to..]);
        out
    }
}

/// Base62 rendering of the random part of a fresh ULID.
fn random_token() -> String {
    let mut bits = Ulid::new().random();
    let mut token = String::with_capacity(TOKEN_LEN);
    for _ in 0..TOKEN_LEN {
        token.push(ALPHABET[(bits % 62) as usize] as char);
        bits /= 62;
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_alphanumeric_and_distinct() {
        let mut substituter = TokenSubstituter::new();
        let tokens: Vec<String> = (0..200)
            .map(|i| substituter.reserve(i.to_string(), false))
            .collect();

        for token in &tokens {
            assert_eq!(token.len(), TOKEN_LEN);
            assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        }
        let mut unique = tokens.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), tokens.len());
        assert_eq!(substituter.len(), 200);
    }

    #[test]
    fn test_values_with_metacharacters_survive() {
        let mut substituter = TokenSubstituter::new();
        let dollar = substituter.reserve("$1", false);
        let braces = substituter.reserve(r#"{"defaultValue":"a\"b$&"}"#, true);

        let payload = format!(r#"{{"body": "x {dollar} y", "vars": "{braces}"}}"#);
        assert_eq!(
            substituter.resolve(&payload),
            r#"{"body": "x $1 y", "vars": {"defaultValue":"a\"b$&"}}"#
        );
    }

    #[test]
    fn test_value_containing_another_token_is_not_rescanned() {
        let mut substituter = TokenSubstituter::new();
        let inner = substituter.reserve("INNER", false);
        let outer = substituter.reserve(format!("<{inner}>"), false);

        let resolved = substituter.resolve(&format!("{outer}|{inner}"));
        assert_eq!(resolved, format!("<{inner}>|INNER"));
    }

    #[test]
    fn test_quoted_token_without_quotes_is_left_alone() {
        let mut substituter = TokenSubstituter::new();
        let token = substituter.reserve("{}", true);

        assert_eq!(substituter.resolve(&format!("a {token} b")), format!("a {token} b"));
        assert_eq!(substituter.resolve(&format!("a \"{token}\" b")), "a {} b");
    }

    #[test]
    fn test_every_occurrence_replaced() {
        let mut substituter = TokenSubstituter::new();
        let token = substituter.reserve("v", false);
        assert_eq!(substituter.resolve(&format!("{token}{token} {token}")), "vv v");
    }

    #[test]
    fn test_payload_without_tokens_unchanged() {
        let mut substituter = TokenSubstituter::new();
        substituter.reserve("x", false);
        assert_eq!(substituter.resolve("nothing to see here, ünïcode"), "nothing to see here, ünïcode");
        assert_eq!(TokenSubstituter::new().resolve("short"), "short");
    }
}
