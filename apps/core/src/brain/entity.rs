//! Entity extraction: the literal equation or expression inside a query.
//!
//! Two extractors, mutually exclusive by construction: algebraic extraction is
//! only attempted when no trigonometric function token is present. Both work
//! on normalized text and never fail; a miss is `None`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// A literal believed to contain a solvable equation or expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum EntityMatch {
    Algebraic(String),
    Trigonometric(String),
}

impl EntityMatch {
    pub fn text(&self) -> &str {
        match self {
            EntityMatch::Algebraic(text) | EntityMatch::Trigonometric(text) => text,
        }
    }

    pub fn is_algebraic(&self) -> bool {
        matches!(self, EntityMatch::Algebraic(_))
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text().contains(needle)
    }
}

/// Words that signal a factoring request.
const FACTORING_CUES: &[&str] = &["carpan", "faktor", "ayir"];

/// Function names for the bare-name fallback, inverse names first so that
/// `arcsin` is never shortened to `sin`.
const BARE_FUNCTION_NAMES: &[&str] = &[
    "arcsin", "arccos", "arctan", "kosinus", "sinus", "tanjant", "sin", "cos", "tan",
];

// Longest spellings first so `kosinus` counts once, not as `kosinus` + `sin`
static TRIG_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"kosinus|sinus|tanjant|sin|cos|tan").expect("Invalid regex: trig token")
});

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("Invalid regex: first number"));

static FACTORING_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // 2x² + 4x + 4
        Regex::new(r"\d*[x-z]²\s*[+\-]\s*\d*[x-z]\s*[+\-]\s*\d+")
            .expect("Invalid regex: superscript trinomial"),
        Regex::new(r"\d*[x-z]\^2\s*[+\-]\s*\d*[x-z]\s*[+\-]\s*\d+")
            .expect("Invalid regex: caret trinomial"),
        // 2x² - 8
        Regex::new(r"\d*[x-z]²\s*[+\-]\s*\d+").expect("Invalid regex: superscript binomial"),
        Regex::new(r"\d*[x-z]\^2\s*[+\-]\s*\d+").expect("Invalid regex: caret binomial"),
    ]
});

/// Which part of a match becomes the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    /// The whole normalized query
    WholeText,
    /// The `shape` group, leaving out the word-boundary guard
    Shape,
}

/// A named trigonometric pattern.
struct TrigShape {
    name: &'static str,
    pattern: Regex,
    capture: Capture,
}

impl TrigShape {
    fn new(name: &'static str, pattern: &str, capture: Capture) -> Self {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("Invalid regex: trig shape {}: {}", name, e));
        Self {
            name,
            pattern,
            capture,
        }
    }

    fn extract(&self, text: &str) -> Option<String> {
        let caps = self.pattern.captures(text)?;
        let found = match self.capture {
            Capture::WholeText => text,
            Capture::Shape => caps.name("shape")?.as_str(),
        };
        Some(found.trim().to_string())
    }
}

// Priority order after the compound check: mixed equations, simple variable
// equations, then single calls and unit conversions. First match wins.
static TRIG_SHAPES: LazyLock<Vec<TrigShape>> = LazyLock::new(|| {
    vec![
        TrigShape::new(
            "mixed_variable_first",
            r"(?:sin|cos|tan)\s*\(\s*x\s*\)\s*[+\-]\s*(?:sin|cos|tan)\s*\(\s*\d+\s*\)\s*=\s*[\d.]+",
            Capture::WholeText,
        ),
        TrigShape::new(
            "mixed_constant_first",
            r"(?:sin|cos|tan)\s*\(\s*\d+\s*\)\s*[+\-]\s*(?:sin|cos|tan)\s*\(\s*x\s*\)\s*=\s*[\d.]+",
            Capture::WholeText,
        ),
        TrigShape::new(
            "variable_equation",
            r"(?:^|[^a-z])(?P<shape>(?:arc)?(?:sin|cos|tan)\s*\(\s*x\s*\)\s*=\s*[\d.\-]+)",
            Capture::Shape,
        ),
        TrigShape::new(
            "bare_variable_equation",
            r"(?:^|[^a-z])(?P<shape>(?:arc)?(?:sin|cos|tan)\s*x\s*=\s*[\d.\-]+)",
            Capture::Shape,
        ),
        TrigShape::new(
            "call",
            r"(?:^|[^a-z])(?P<shape>(?:sin|cos|tan|sinus|kosinus|tanjant)\s*\(\s*\d+(?:\.\d+)?\s*\))",
            Capture::Shape,
        ),
        TrigShape::new(
            "spaced_call",
            r"(?:^|[^a-z])(?P<shape>(?:sin|cos|tan|sinus|kosinus|tanjant)\s*\d+(?:\.\d+)?)",
            Capture::Shape,
        ),
        TrigShape::new(
            "inverse_call",
            r"(?:^|[^a-z])(?P<shape>(?:arcsin|arccos|arctan|asin|acos|atan)\s*\(\s*[\d.,]+\s*\))",
            Capture::Shape,
        ),
        TrigShape::new(
            "degrees_to_radians",
            r"(?P<shape>\d+(?:\.\d+)?\s*(?:derece\w*|°).*?rad\w*)",
            Capture::Shape,
        ),
        TrigShape::new(
            "radians_to_degrees",
            r"(?P<shape>\d+(?:\.\d+)?\s*rad\w*.*?(?:derece\w*|°))",
            Capture::Shape,
        ),
    ]
});

/// Number of trigonometric function tokens in `text`.
pub fn trig_token_count(text: &str) -> usize {
    TRIG_TOKEN.find_iter(text).count()
}

fn compact(text: &str) -> String {
    text.split_whitespace().collect()
}

fn is_math_token(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, 'x' | 'y' | 'z' | '²' | '³' | '^' | '+' | '-' | '*' | '/' | '.' | '(' | ')'))
}

/// The trailing run of math tokens of an equation side, whitespace removed.
fn equation_body(left: &str) -> String {
    let mut tokens: Vec<&str> = left
        .split_whitespace()
        .rev()
        .take_while(|t| is_math_token(t))
        .collect();
    tokens.reverse();

    let body: String = tokens.concat();
    if body.is_empty() {
        compact(left)
    } else {
        body
    }
}

/// Extracts [`EntityMatch`]es from normalized queries.
#[derive(Debug, Default, Clone, Copy)]
pub struct EntityExtractor;

impl EntityExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the single entity of a normalized query, if any.
    pub fn extract(&self, text: &str) -> Option<EntityMatch> {
        if trig_token_count(text) == 0 {
            if let Some(found) = self.extract_algebraic(text) {
                return Some(EntityMatch::Algebraic(found));
            }
        }

        self.extract_trigonometric(text)
            .map(EntityMatch::Trigonometric)
    }

    /// Algebraic equation (`<left> = <right>`) or factoring expression.
    pub fn extract_algebraic(&self, text: &str) -> Option<String> {
        if let Some((left, rest)) = text.split_once('=') {
            let left = left.trim();
            if left.contains(['x', '²', '^']) {
                let right = rest
                    .split('=')
                    .next()
                    .and_then(|side| side.split_whitespace().next())
                    .unwrap_or("0");
                return Some(format!("{} = {}", equation_body(left), right));
            }
        }

        if FACTORING_CUES.iter().any(|cue| text.contains(cue)) {
            return FACTORING_SHAPES
                .iter()
                .find_map(|shape| shape.find(text))
                .map(|m| compact(m.as_str()));
        }

        None
    }

    /// Trigonometric expression or equation, first matching stage wins.
    pub fn extract_trigonometric(&self, text: &str) -> Option<String> {
        if let Some(expression) = Self::compound_expression(text) {
            return Some(expression);
        }

        if let Some(found) = TRIG_SHAPES.iter().find_map(|shape| {
            shape.extract(text).inspect(|found| {
                tracing::trace!(shape = shape.name, entity = %found, "trig shape matched");
            })
        }) {
            return Some(found);
        }

        BARE_FUNCTION_NAMES
            .iter()
            .find(|name| text.contains(*name))
            .and_then(|name| {
                FIRST_NUMBER
                    .find(text)
                    .map(|number| format!("{}({})", name, number.as_str()))
            })
    }

    /// Several function tokens or an arithmetic operator, unless the text is
    /// an equation in `x`.
    fn compound_expression(text: &str) -> Option<String> {
        if text.contains('=') && text.contains('x') {
            return None;
        }
        let has_operator = text.contains(['+', '-', '*', '/']);
        if trig_token_count(text) < 2 && !has_operator {
            return None;
        }

        let expression = match text.split_once('=') {
            Some((left, _)) => left.trim(),
            None => text.trim(),
        };
        (!expression.is_empty()).then(|| expression.to_string())
    }
}
