//! Template compilation.
//!
//! # Responsibilities
//! - Split a template into literal text and `$(label)` placeholders
//! - Substitute each placeholder with a capture-anything group
//! - Report captures in placeholder order
//!
//! # Design Decisions
//! - Whole-string match: the pattern is compiled as `^(?:...)$`
//! - Placeholders capture any characters, newlines included
//! - Literal text is regex syntax by default (`LiteralMode::Regex`);
//!   `LiteralMode::Escaped` makes it literal
//! - Groups written by hand inside literal text are matched but never reported

use regex::Regex;

use crate::error::RegistrationError;

const OPEN: &str = "$(";
const CLOSE: char = ')';
const SLOT_PREFIX: &str = "servant_slot_";

/// How literal template text is placed into the compiled pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LiteralMode {
    /// Literal text passes through unescaped and may contain regex syntax.
    #[default]
    Regex,
    /// Literal text is escaped and matches verbatim.
    Escaped,
}

/// A piece of a parsed template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Split a template into literal and placeholder segments, left to right.
///
/// A `$(` without a closing `)` is literal text.
pub fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find(CLOSE) else {
            break;
        };
        if start > 0 {
            out.push(Segment::Literal(&rest[..start]));
        }
        out.push(Segment::Placeholder(&after[..end]));
        rest = &after[end + 1..];
    }

    if !rest.is_empty() {
        out.push(Segment::Literal(rest));
    }
    out
}

/// A compiled template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    regex: Regex,
    /// Capture group index of each placeholder, in template order.
    slots: Vec<usize>,
    labels: Vec<String>,
}

impl Template {
    /// Compile a template with literal text treated as regex syntax.
    pub fn compile(template: &str) -> Result<Self, RegistrationError> {
        Self::compile_with(template, LiteralMode::Regex)
    }

    /// Compile a template with the given literal mode.
    pub fn compile_with(template: &str, mode: LiteralMode) -> Result<Self, RegistrationError> {
        let mut pattern = String::with_capacity(template.len() + 16);
        let mut labels = Vec::new();
        pattern.push_str("^(?:");

        for segment in segments(template) {
            match segment {
                Segment::Literal(text) => match mode {
                    LiteralMode::Regex => pattern.push_str(text),
                    LiteralMode::Escaped => pattern.push_str(&regex::escape(text)),
                },
                Segment::Placeholder(label) => {
                    pattern.push_str("(?P<");
                    pattern.push_str(SLOT_PREFIX);
                    pattern.push_str(&labels.len().to_string());
                    pattern.push_str(">(?s:.*))");
                    labels.push(label.to_string());
                }
            }
        }
        pattern.push_str(")$");

        let regex = Regex::new(&pattern).map_err(|source| RegistrationError::InvalidPattern {
            template: template.to_string(),
            source,
        })?;

        let mut slots = vec![0; labels.len()];
        for (index, name) in regex.capture_names().enumerate() {
            let Some(slot) = name
                .and_then(|n| n.strip_prefix(SLOT_PREFIX))
                .and_then(|n| n.parse::<usize>().ok())
            else {
                continue;
            };
            if let Some(entry) = slots.get_mut(slot) {
                *entry = index;
            }
        }

        Ok(Self {
            source: template.to_string(),
            regex,
            slots,
            labels,
        })
    }

    /// The template as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder labels, in template order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of captures a successful match yields.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Match the whole candidate, returning one capture per placeholder.
    ///
    /// A placeholder that did not participate in the match (for example one
    /// side of a hand-written alternation) yields an empty string.
    pub fn captures(&self, candidate: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(candidate)?;
        Some(
            self.slots
                .iter()
                .map(|&i| caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }
}
