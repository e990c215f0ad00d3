use log::trace;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

use crate::error::{FilipError, Result};
use crate::ql::{
    operator::Operator,
    parser_utils::is_attr_path,
    value::{is_date, Value},
};

/// A single `attribute operator value` condition.
///
/// Statements validate on construction and cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Statement {
    left: String,
    operator: Operator,
    right: Value,
}

impl Statement {
    pub fn new<L, O, R>(left: L, operator: O, right: R) -> Result<Self>
    where
        L: Into<String>,
        O: TryInto<Operator>,
        FilipError: From<<O as TryInto<Operator>>::Error>,
        R: Into<Value>,
    {
        let statement = Statement {
            left: left.into(),
            operator: operator.try_into()?,
            right: right.into(),
        };
        statement.validate()?;
        Ok(statement)
    }

    /// Parses a single statement such as `temperature>=44`.
    ///
    /// Operators are tried in [`Operator::PRIORITY`] order and the first one
    /// that splits the input into exactly two non-empty parts wins.
    pub fn parse(input: &str) -> Result<Statement> {
        let input = input.trim();
        let (left, operator, right) = split(input).ok_or_else(|| {
            FilipError::Format(format!(
                "no comparison operator found in statement '{}'",
                input
            ))
        })?;
        if !is_attr_path(left) {
            return Err(FilipError::Format(format!(
                "'{}' in statement '{}' is not a valid attribute path",
                left, input
            )));
        }
        trace!("statement '{}' split on '{}'", input, operator);
        Statement::new(left, operator, Value::coerce(right))
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn right(&self) -> &Value {
        &self.right
    }

    pub fn into_parts(self) -> (String, Operator, Value) {
        (self.left, self.operator, self.right)
    }

    pub fn to_str(&self) -> String {
        self.to_string()
    }

    fn validate(&self) -> Result<()> {
        if !is_attr_path(&self.left) {
            return Err(FilipError::Validation(format!(
                "'{}' is not a valid attribute path",
                self.left
            )));
        }

        match &self.right {
            Value::Float(value) if !value.is_finite() => {
                return Err(FilipError::Validation(format!(
                    "right hand side of '{}' must be a finite number",
                    self.left
                )));
            }
            Value::Text(text) if text.is_empty() => {
                return Err(FilipError::Validation(format!(
                    "right hand side of '{}' is empty",
                    self.left
                )));
            }
            Value::Text(text) if text.chars().any(|c| c == ';' || c.is_control()) => {
                return Err(FilipError::Validation(format!(
                    "right hand side '{}' contains a statement separator or control character",
                    text
                )));
            }
            _ => {}
        }

        if let Value::Text(text) = &self.right {
            let rendered = self.to_string();
            if split(&rendered) != Some((self.left.as_str(), self.operator, text.as_str())) {
                return Err(FilipError::Validation(format!(
                    "right hand side '{}' contains an operator that changes how '{}' splits",
                    text, rendered
                )));
            }
        }

        if self.right.range().is_some() && !self.operator.accepts_range() {
            return Err(FilipError::Validation(format!(
                "range '{}' is only valid with '==' or '!=', not '{}'",
                self.right, self.operator
            )));
        }

        if self.operator.is_ordering() {
            return check_ordering_operand(self.operator, &self.right);
        }

        if let Some(items) = self.right.items() {
            if items.iter().any(|item| item.is_empty()) {
                return Err(FilipError::Validation(format!(
                    "list '{}' contains an empty item",
                    self.right
                )));
            }
        }
        Ok(())
    }
}

/// The first operator in [`Operator::PRIORITY`] that cuts `input` into
/// exactly two non-empty parts.
fn split(input: &str) -> Option<(&str, Operator, &str)> {
    Operator::PRIORITY.into_iter().find_map(|operator| {
        let mut parts = input.split(operator.as_str());
        match (parts.next(), parts.next(), parts.next()) {
            (Some(left), Some(right), None) if !left.is_empty() && !right.is_empty() => {
                Some((left, operator, right))
            }
            _ => None,
        }
    })
}

fn check_ordering_operand(operator: Operator, right: &Value) -> Result<()> {
    let text = match right {
        Value::Integer(_) | Value::Float(_) => return Ok(()),
        Value::Text(text) => text,
    };
    if is_date(text) {
        return Ok(());
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(()),
        Ok(_) => Err(FilipError::Validation(format!(
            "invalid combination of operator '{}' and right hand side '{}': not a finite number",
            operator, text
        ))),
        Err(err) => Err(FilipError::Validation(format!(
            "invalid combination of operator '{}' and right hand side '{}': {}",
            operator, text, err
        ))),
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.left, self.operator, self.right)
    }
}

impl FromStr for Statement {
    type Err = FilipError;

    fn from_str(s: &str) -> Result<Self> {
        Statement::parse(s)
    }
}

impl TryFrom<String> for Statement {
    type Error = FilipError;

    fn try_from(value: String) -> Result<Self> {
        Statement::parse(&value)
    }
}

impl From<Statement> for String {
    fn from(statement: Statement) -> Self {
        statement.to_string()
    }
}

/// Normalizes the different shapes a statement can be handed in as.
pub trait IntoStatement {
    fn into_statement(self) -> Result<Statement>;
}

impl IntoStatement for Statement {
    fn into_statement(self) -> Result<Statement> {
        Ok(self)
    }
}

impl IntoStatement for &Statement {
    fn into_statement(self) -> Result<Statement> {
        Ok(self.clone())
    }
}

impl IntoStatement for &str {
    fn into_statement(self) -> Result<Statement> {
        Statement::parse(self)
    }
}

impl IntoStatement for String {
    fn into_statement(self) -> Result<Statement> {
        Statement::parse(&self)
    }
}

impl<L, O, R> IntoStatement for (L, O, R)
where
    L: Into<String>,
    O: TryInto<Operator>,
    FilipError: From<<O as TryInto<Operator>>::Error>,
    R: Into<Value>,
{
    fn into_statement(self) -> Result<Statement> {
        Statement::new(self.0, self.1, self.2)
    }
}

/// Accepts a statement string or a `[left, operator, right]` array.
impl IntoStatement for JsonValue {
    fn into_statement(self) -> Result<Statement> {
        match self {
            JsonValue::String(text) => Statement::parse(&text),
            JsonValue::Array(items) => {
                let [left, operator, right]: [JsonValue; 3] =
                    items.try_into().map_err(|items: Vec<JsonValue>| {
                        FilipError::InvalidArgument(format!(
                            "statement needs exactly 3 elements, got {}",
                            items.len()
                        ))
                    })?;
                let left = left.as_str().ok_or_else(|| {
                    FilipError::InvalidArgument(format!("attribute must be a string, got {}", left))
                })?;
                let operator = operator.as_str().ok_or_else(|| {
                    FilipError::InvalidArgument(format!("operator must be a string, got {}", operator))
                })?;
                let right = match right {
                    JsonValue::String(text) => Value::Text(text),
                    JsonValue::Number(number) => match number.as_i64() {
                        Some(value) => Value::Integer(value),
                        None => Value::Float(number.as_f64().ok_or_else(|| {
                            FilipError::InvalidArgument(format!("unsupported number {}", number))
                        })?),
                    },
                    other => {
                        return Err(FilipError::InvalidArgument(format!(
                            "right hand side must be a number or string, got {}",
                            other
                        )))
                    }
                };
                Statement::new(left, operator, right)
            }
            other => Err(FilipError::InvalidArgument(format!(
                "cannot build a statement from {}",
                other
            ))),
        }
    }
}
