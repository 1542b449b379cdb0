//! Guarded token substitution.
//!
//! A [`SubstitutionRule`] replaces a literal token only when the character
//! right after it is one of a fixed set of boundary characters, and skips any
//! occurrence that is already followed by the guard suffix. Both checks are
//! lookaheads: the boundary character is never consumed, so a boundary can
//! sit directly in front of the next occurrence.

use regex::Regex;
use thiserror::Error;

/// Token rewritten by the built-in rule.
pub const BUILTIN_TOKEN: &str = "text-muted";
/// Replacement written by the built-in rule.
pub const BUILTIN_REPLACEMENT: &str = "text-muted-foreground";
/// Characters that may follow the token: space, double quote, single quote, backslash.
///
/// Newline and end of content are deliberately absent.
pub const DEFAULT_BOUNDARIES: &str = " \"'\\";

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("substitution token must not be empty")]
    EmptyToken,

    #[error("rule for '{0}' has no boundary characters")]
    EmptyBoundaries(String),

    #[error("rule for '{0}' replaces the token with itself")]
    NoOp(String),

    #[error("failed to compile token pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A fixed find/replace transformation with a boundary lookahead and an
/// idempotence guard.
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    token: String,
    replacement: String,
    boundaries: String,
    guard: Option<String>,
    pattern: Regex,
}

/// Output of [`SubstitutionRule::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Substitution holds the rewritten text"]
pub struct Substitution {
    pub text: String,
    pub replacements: usize,
}

impl Substitution {
    pub fn changed(&self) -> bool {
        self.replacements > 0
    }
}

impl SubstitutionRule {
    /// The `text-muted` → `text-muted-foreground` rule.
    pub fn builtin() -> Self {
        Self {
            token: BUILTIN_TOKEN.to_string(),
            replacement: BUILTIN_REPLACEMENT.to_string(),
            boundaries: DEFAULT_BOUNDARIES.to_string(),
            guard: Some("-foreground".to_string()),
            pattern: Regex::new(&regex::escape(BUILTIN_TOKEN))
                .expect("escaped literal is a valid pattern"),
        }
    }

    /// Build a rule with the default boundary set and a guard derived from
    /// the replacement.
    pub fn new(
        token: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<Self, RuleError> {
        Self::with_options(token, replacement, DEFAULT_BOUNDARIES, None)
    }

    /// Build a rule with explicit boundaries and guard.
    ///
    /// When `guard` is `None` it is derived as the part of `replacement` that
    /// follows `token`, if `replacement` starts with `token`. `Some("")`
    /// disables the guard.
    pub fn with_options(
        token: impl Into<String>,
        replacement: impl Into<String>,
        boundaries: impl Into<String>,
        guard: Option<String>,
    ) -> Result<Self, RuleError> {
        let token = token.into();
        let replacement = replacement.into();
        let boundaries = boundaries.into();

        if token.is_empty() {
            return Err(RuleError::EmptyToken);
        }
        if boundaries.is_empty() {
            return Err(RuleError::EmptyBoundaries(token));
        }
        if replacement == token {
            return Err(RuleError::NoOp(token));
        }

        let guard = match guard {
            Some(guard) if guard.is_empty() => None,
            Some(guard) => Some(guard),
            None => derive_guard(&token, &replacement),
        };
        let pattern = Regex::new(&regex::escape(&token))?;

        Ok(Self {
            token,
            replacement,
            boundaries,
            guard,
            pattern,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn boundaries(&self) -> &str {
        &self.boundaries
    }

    pub fn guard(&self) -> Option<&str> {
        self.guard.as_deref()
    }

    /// Whether a second pass over this rule's output is guaranteed to change nothing.
    ///
    /// Conservative: `false` means a re-match is possible, not that one will
    /// happen. Rejects rules where a new occurrence could appear:
    /// - inside the replacement, followed by a boundary or by the text after it
    /// - straddling either edge of the replacement
    /// - wrapped around a replacement shorter than the token
    /// - right before a replacement that starts with a boundary
    pub fn is_idempotent(&self) -> bool {
        let at_boundary = |s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| self.boundaries.contains(c))
        };

        if self.replacement.is_empty() || at_boundary(&self.replacement) {
            return false;
        }
        // A guard that opens with a boundary can be broken by a later rewrite.
        if self.guard.as_deref().is_some_and(at_boundary) {
            return false;
        }

        let mut from = 0;
        while let Some(offset) = self.replacement[from..].find(self.token.as_str()) {
            let at = from + offset;
            let rest = &self.replacement[at + self.token.len()..];
            if rest.is_empty() || at_boundary(rest) {
                return false;
            }
            from = at + next_char_len(&self.replacement[at..]);
        }

        if self.token.contains(self.replacement.as_str()) {
            return false;
        }

        let max = self.token.len() - 1;
        !edge_overlap(&self.token, &self.replacement, max)
            && !edge_overlap(&self.replacement, &self.token, max)
    }

    /// Replace every eligible occurrence of the token, left to right.
    pub fn apply(&self, content: &str) -> Substitution {
        let mut text = String::with_capacity(content.len());
        let mut replacements = 0;
        let mut copied = 0;
        let mut pos = 0;

        while let Some(m) = self.pattern.find_at(content, pos) {
            if self.accepts(&content[m.end()..]) {
                text.push_str(&content[copied..m.start()]);
                text.push_str(&self.replacement);
                replacements += 1;
                copied = m.end();
                pos = m.end();
            } else {
                // Failed lookahead: retry from the next character, not past the token.
                pos = m.start() + next_char_len(&content[m.start()..]);
            }
        }

        text.push_str(&content[copied..]);
        Substitution { text, replacements }
    }

    fn accepts(&self, rest: &str) -> bool {
        if let Some(guard) = &self.guard {
            if rest.starts_with(guard.as_str()) {
                return false;
            }
        }
        rest.chars()
            .next()
            .is_some_and(|c| self.boundaries.contains(c))
    }
}

/// Apply `rules` in order, each to the output of the previous one.
pub fn apply_all(rules: &[SubstitutionRule], content: &str) -> Substitution {
    let mut text = content.to_string();
    let mut replacements = 0;
    for rule in rules {
        let step = rule.apply(&text);
        replacements += step.replacements;
        text = step.text;
    }
    Substitution { text, replacements }
}

fn derive_guard(token: &str, replacement: &str) -> Option<String> {
    replacement
        .strip_prefix(token)
        .filter(|suffix| !suffix.is_empty())
        .map(str::to_string)
}

/// Some suffix of `a` equals the prefix of `b` of the same length, for a
/// length between 1 and `max`.
fn edge_overlap(a: &str, b: &str, max: usize) -> bool {
    (1..=max.min(a.len()).min(b.len()))
        .any(|k| b.get(..k).is_some_and(|prefix| a.ends_with(prefix)))
}

fn next_char_len(s: &str) -> usize {
    s.chars().next().map_or(1, char::len_utf8)
}
