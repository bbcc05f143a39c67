//! Parameter values and the small extractors that fill them in.
//!
//! All extractors read normalized text and fall back to fixed defaults where a
//! solver can still do something sensible; the ones returning `Option` leave
//! the decision to the caller.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use super::entity::EntityMatch;

/// A single named parameter handed to a solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Flag(bool),
    Entity(EntityMatch),
}

impl ParamValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(text) => Some(text),
            ParamValue::Entity(entity) => Some(entity.text()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ParamValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Flag(value)
    }
}

impl From<EntityMatch> for ParamValue {
    fn from(value: EntityMatch) -> Self {
        ParamValue::Entity(value)
    }
}

/// Named parameters, ordered by key for stable output.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// Angle units understood by the conversion solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    Degree,
    Radian,
}

impl AngleUnit {
    pub fn label(&self) -> &'static str {
        match self {
            AngleUnit::Degree => "degree",
            AngleUnit::Radian => "radian",
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A `value from -> to` angle conversion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleConversion {
    pub value: f64,
    pub from: AngleUnit,
    pub to: AngleUnit,
}

/// Default operand when a factorial query carries no number.
pub const DEFAULT_FACTORIAL_N: i64 = 5;

/// Default `(n, r)` when a permutation/combination query carries no number.
pub const DEFAULT_N_R: (i64, i64) = (5, 3);

/// Removed from calculus queries, longest first so `integralini` is never
/// cut down to `integr`.
const CALCULUS_FILLER: &[&str] = &[
    "turevini",
    "turev",
    "integralini",
    "integrini",
    "integral",
    "hesapla",
    "nin",
    "bul",
    "coz",
    "al",
];

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid regex: integer"));

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("Invalid regex: decimal"));

static FACTORIAL_OPERAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)!").expect("Invalid regex: factorial operand"));

static N_R_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[pc]\s*\(\s*(\d+)\s*,\s*(\d+)\s*\)").expect("Invalid regex: n,r call")
});

static TRIG_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(kosinus|sinus|tanjant|sin|cos|tan)\s*\(?\s*(\d+(?:\.\d+)?)\s*\)?")
        .expect("Invalid regex: trig call")
});

static INVERSE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(arcsin|arccos|arctan|asin|acos|atan)\s*\(?\s*([\d.,]+)\s*\)?")
        .expect("Invalid regex: inverse trig call")
});

static DEGREES_TO_RADIANS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(?:derece|°).*?rad").expect("Invalid regex: degrees to radians")
});

static RADIANS_TO_DEGREES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*rad.*?(?:derece|°)").expect("Invalid regex: radians to degrees")
});

static ANGLE_CUES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(\d+(?:\.\d+)?)°").expect("Invalid regex: degree sign"),
        Regex::new(r"(\d+(?:\.\d+)?)\s*derece").expect("Invalid regex: degree word"),
        Regex::new(r"c\s*=\s*(\d+(?:\.\d+)?)").expect("Invalid regex: angle c"),
    ]
});

static EXPLICIT_SIDES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        (
            "radius",
            Regex::new(r"(?:^|[^a-z])r\s*=\s*(\d+(?:\.\d+)?)").expect("Invalid regex: r="),
        ),
        (
            "a",
            Regex::new(r"(?:^|[^a-z])a\s*=\s*(\d+(?:\.\d+)?)").expect("Invalid regex: a="),
        ),
        (
            "b",
            Regex::new(r"(?:^|[^a-z])b\s*=\s*(\d+(?:\.\d+)?)").expect("Invalid regex: b="),
        ),
    ]
});

fn parse_number(text: &str) -> Option<f64> {
    text.parse().ok()
}

/// The function part of a derivative/integral query.
///
/// Filler words are removed, `²`/`³` become `^2`/`^3`, and an empty result
/// defaults to `x`.
pub fn calculus_body(text: &str) -> String {
    let mut body = text.to_string();
    for filler in CALCULUS_FILLER {
        body = body.replace(filler, "");
    }
    let body = body.replace('²', "^2").replace('³', "^3");
    let body = body.split_whitespace().collect::<Vec<_>>().join(" ");

    if body.is_empty() {
        "x".to_string()
    } else {
        body
    }
}

/// An integer literal as a parameter. Literals outside `i64` are kept as
/// written; judging them is the solver's job.
pub fn integer_operand(literal: &str) -> ParamValue {
    literal
        .parse::<i64>()
        .map(ParamValue::Integer)
        .unwrap_or_else(|_| ParamValue::Text(literal.to_string()))
}

/// Factorial operand: `N!` first, then the first integer, then the default.
pub fn first_integer(text: &str) -> ParamValue {
    FACTORIAL_OPERAND
        .captures(text)
        .and_then(|caps| caps.get(1))
        .or_else(|| INTEGER.find(text))
        .map(|m| integer_operand(m.as_str()))
        .unwrap_or(ParamValue::Integer(DEFAULT_FACTORIAL_N))
}

/// `(n, r)` for permutations and combinations.
///
/// `P(n,r)`/`C(n,r)` call syntax wins; otherwise the first two integers, a
/// lone integer `n` gives `(n, n / 2)`, and no integer gives the default.
/// `None` when a lone `n` is too large to derive `r` from.
pub fn n_r_pair(text: &str) -> Option<(ParamValue, ParamValue)> {
    if let Some(caps) = N_R_CALL.captures(text) {
        if let (Some(n), Some(r)) = (caps.get(1), caps.get(2)) {
            return Some((integer_operand(n.as_str()), integer_operand(r.as_str())));
        }
    }

    let literals: Vec<&str> = INTEGER.find_iter(text).map(|m| m.as_str()).collect();

    match literals.as_slice() {
        [n, r, ..] => Some((integer_operand(n), integer_operand(r))),
        [n] => match integer_operand(n) {
            ParamValue::Integer(n) => Some((n.into(), (n / 2).into())),
            _ => None,
        },
        [] => Some((DEFAULT_N_R.0.into(), DEFAULT_N_R.1.into())),
    }
}

/// Canonical name of a (possibly localized) trigonometric function.
pub fn canonical_trig_name(name: &str) -> &'static str {
    match name {
        "sin" | "sinus" => "sin",
        "cos" | "kosinus" => "cos",
        "tan" | "tanjant" => "tan",
        "arcsin" | "asin" => "arcsin",
        "arccos" | "acos" => "arccos",
        "arctan" | "atan" => "arctan",
        _ => "unknown",
    }
}

/// Function and angle (degrees) of a single trigonometric call.
pub fn trig_call(text: &str) -> Option<(&'static str, f64)> {
    let caps = TRIG_CALL.captures(text)?;
    let name = canonical_trig_name(caps.get(1)?.as_str());
    let angle = parse_number(caps.get(2)?.as_str())?;
    Some((name, angle))
}

/// Function and argument of an inverse call; `,` is read as a decimal point.
pub fn inverse_call(text: &str) -> Option<(&'static str, f64)> {
    let caps = INVERSE_CALL.captures(text)?;
    let name = canonical_trig_name(caps.get(1)?.as_str());
    let value = parse_number(&caps.get(2)?.as_str().replace(',', "."))?;
    Some((name, value))
}

/// Angle conversion request, degrees to radians tried first.
pub fn angle_conversion(text: &str) -> Option<AngleConversion> {
    let directions = [
        (&*DEGREES_TO_RADIANS, AngleUnit::Degree, AngleUnit::Radian),
        (&*RADIANS_TO_DEGREES, AngleUnit::Radian, AngleUnit::Degree),
    ];

    directions.into_iter().find_map(|(pattern, from, to)| {
        let caps = pattern.captures(text)?;
        let value = parse_number(caps.get(1)?.as_str())?;
        Some(AngleConversion { value, from, to })
    })
}

/// Side lengths, angle and shape hints of a geometry query.
pub fn geometry_params(text: &str) -> ParamMap {
    let mut params = ParamMap::new();

    let numbers: Vec<f64> = DECIMAL
        .find_iter(text)
        .filter_map(|m| parse_number(m.as_str()))
        .collect();

    if let Some(angle) = ANGLE_CUES.iter().find_map(|cue| {
        cue.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_number(m.as_str()))
    }) {
        params.insert("angle_c".to_string(), angle.into());
    }

    if ["dik ucgen", "pisagor", "pitagor"]
        .iter()
        .any(|cue| text.contains(cue))
    {
        params.insert("right_triangle".to_string(), true.into());
    }

    match numbers.as_slice() {
        [] => {}
        [single] => {
            let key = if text.contains("kare") || text.contains("alan") {
                "side"
            } else if text.contains("daire") || text.contains("yaricap") || text.contains("r=") {
                "radius"
            } else if text.contains("cap") {
                "diameter"
            } else {
                "a"
            };
            params.insert(key.to_string(), (*single).into());
        }
        [a, b, rest @ ..] => {
            params.insert("a".to_string(), (*a).into());
            params.insert("b".to_string(), (*b).into());
            if let Some(c) = rest.first() {
                params.insert("c".to_string(), (*c).into());
            }
        }
    }

    for (key, pattern) in EXPLICIT_SIDES.iter() {
        if let Some(value) = pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_number(m.as_str()))
        {
            params.insert((*key).to_string(), value.into());
        }
    }

    params
}
