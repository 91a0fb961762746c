// src/core/acl/pattern.rs

//! Glob-style patterns used by key and Pub/Sub channel permissions.
//!
//! Patterns are compiled once, when a rule is applied, into an anchored
//! byte regex, so binary keys and channels match exactly. Supported syntax:
//! `*` (any sequence), `?` (any single byte), `[abc]` / `[^abc]` / `[a-z]`
//! (byte classes) and `\x` (literal `x`).

use super::error::AclError;
use regex::bytes::Regex;
use std::fmt;

/// A single compiled glob pattern. Equality uses the source text only.
#[derive(Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    /// Compiles a glob pattern, failing with `InvalidRule` on malformed syntax.
    /// Whitespace is rejected so the pattern survives as one ACL file token.
    pub fn new(source: &str) -> Result<Self, AclError> {
        if source.is_empty() {
            return Err(AclError::invalid_rule(source, "empty pattern"));
        }
        if source.chars().any(char::is_whitespace) {
            return Err(AclError::invalid_rule(
                source,
                "patterns cannot contain whitespace",
            ));
        }
        let regex_pattern = glob_to_regex(source)?;
        let regex = Regex::new(&regex_pattern)
            .map_err(|e| AclError::invalid_rule(source, format!("invalid pattern: {e}")))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern as it was written in the rule.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, subject: impl AsRef<[u8]>) -> bool {
        self.regex.is_match(subject.as_ref())
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for GlobPattern {}

impl fmt::Debug for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GlobPattern").field(&self.source).finish()
    }
}

/// Appends one literal byte to a regex operating in byte mode.
fn push_literal(regex_pattern: &mut String, byte: u8) {
    if byte.is_ascii() {
        regex_pattern.push_str(&regex::escape(&char::from(byte).to_string()));
    } else {
        regex_pattern.push_str(&format!("\\x{byte:02X}"));
    }
}

/// Converts a glob into an anchored regex string matching raw bytes.
fn glob_to_regex(pattern: &str) -> Result<String, AclError> {
    let mut regex_pattern = String::with_capacity(pattern.len() * 2 + 8);
    regex_pattern.push_str("(?s-u)^");
    let mut bytes = pattern.bytes().peekable();
    while let Some(b) = bytes.next() {
        match b {
            b'*' => regex_pattern.push_str(".*"),
            b'?' => regex_pattern.push('.'),
            b'[' => {
                regex_pattern.push('[');
                if bytes.peek() == Some(&b'^') {
                    regex_pattern.push('^');
                    bytes.next();
                }
                let mut closed = false;
                let mut members = 0usize;
                while let Some(pb) = bytes.next() {
                    match pb {
                        b']' => {
                            closed = true;
                            break;
                        }
                        b'-' => regex_pattern.push('-'),
                        b'\\' => match bytes.next() {
                            Some(escaped) => push_literal(&mut regex_pattern, escaped),
                            None => break,
                        },
                        _ => push_literal(&mut regex_pattern, pb),
                    }
                    members += 1;
                }
                if !closed {
                    return Err(AclError::invalid_rule(pattern, "unterminated '[' class"));
                }
                if members == 0 {
                    return Err(AclError::invalid_rule(pattern, "empty character class"));
                }
                regex_pattern.push(']');
            }
            b'\\' => match bytes.next() {
                Some(next_byte) => push_literal(&mut regex_pattern, next_byte),
                None => {
                    return Err(AclError::invalid_rule(pattern, "trailing escape character"));
                }
            },
            _ => push_literal(&mut regex_pattern, b),
        }
    }
    regex_pattern.push('$');
    Ok(regex_pattern)
}

/// An ordered, duplicate-free collection of patterns.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<GlobPattern>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pattern. Returns `false` if an identical pattern is already present.
    pub fn insert(&mut self, pattern: GlobPattern) -> bool {
        if self.contains(pattern.as_str()) {
            return false;
        }
        self.patterns.push(pattern);
        true
    }

    pub fn contains(&self, source: &str) -> bool {
        self.patterns.iter().any(|p| p.as_str() == source)
    }

    pub fn clear(&mut self) {
        self.patterns.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlobPattern> {
        self.patterns.iter()
    }

    /// True if any pattern in the set matches `subject`.
    pub fn any_match(&self, subject: impl AsRef<[u8]>) -> bool {
        let subject = subject.as_ref();
        self.patterns.iter().any(|p| p.is_match(subject))
    }
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.patterns.iter().map(GlobPattern::as_str))
            .finish()
    }
}
