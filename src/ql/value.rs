use chrono::{DateTime, NaiveDate, NaiveDateTime};
use nom::{
    bytes::complete::{tag, take_until},
    character::complete::{digit1, one_of},
    combinator::{all_consuming, map_res, opt, recognize, rest},
    number::complete::double,
    sequence::{pair, separated_pair},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Right hand side literal of a query statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Interprets a raw right hand side the way the broker would read it:
    /// integer first, then float, otherwise plain text.
    pub fn coerce(raw: &str) -> Value {
        if let Ok((_, value)) = all_consuming(parse_integer)(raw) {
            return Value::Integer(value);
        }
        match parse_float(raw) {
            Some(value) => Value::Float(value),
            None => Value::Text(raw.to_string()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric view of the value. Text counts when it is a float literal.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            Value::Text(text) => parse_float(text),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Bounds of a `min..max` range. Both bounds have to be numbers or
    /// both dates; any other text containing `..` is not a range.
    pub fn range(&self) -> Option<(&str, &str)> {
        let text = self.as_text()?;
        let result: IResult<&str, (&str, &str)> =
            all_consuming(separated_pair(take_until(".."), tag(".."), rest))(text);
        let (min, max) = match result {
            Ok((_, bounds)) => bounds,
            Err(_) => return None,
        };
        let numeric = Value::coerce(min).is_number() && Value::coerce(max).is_number();
        if numeric || (is_date(min) && is_date(max)) {
            Some((min, max))
        } else {
            None
        }
    }

    /// Items of a comma separated list, if the value is one.
    pub fn items(&self) -> Option<Vec<&str>> {
        let text = self.as_text()?;
        if text.contains(',') {
            Some(text.split(',').collect())
        } else {
            None
        }
    }
}

fn parse_integer(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), |digits: &str| {
        digits.parse::<i64>()
    })(input)
}

// `double` also accepts "inf" and "nan"; a literal has to carry a digit.
fn parse_float(raw: &str) -> Option<f64> {
    if !raw.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    let result: IResult<&str, f64> = all_consuming(double)(raw);
    match result {
        Ok((_, value)) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// ISO-8601 date or date-time, with or without an offset.
pub(crate) fn is_date(text: &str) -> bool {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

fn float_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_bits(*a) == float_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Integer(value) => value.hash(state),
            Value::Float(value) => float_bits(*value).hash(state),
            Value::Text(text) => text.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            // Debug keeps the fraction ("40.0"), so the text reads back as a float.
            Value::Float(value) => write!(f, "{:?}", value),
            Value::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}
