use nom::{branch::alt, bytes::complete::tag, combinator::map, IResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FilipError;

/// Comparison operators of the Simple Query Language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    Equal,          // ==
    Unequal,        // !=
    GreaterThan,    // >
    LessThan,       // <
    GreaterOrEqual, // >=
    LessOrEqual,    // <=
    MatchPattern,   // ~=
}

impl Operator {
    /// Order in which `Statement::parse` tries to split a statement.
    /// Two-character tokens come before their one-character prefixes.
    pub const PRIORITY: [Operator; 7] = [
        Operator::Equal,
        Operator::Unequal,
        Operator::GreaterOrEqual,
        Operator::LessOrEqual,
        Operator::MatchPattern,
        Operator::GreaterThan,
        Operator::LessThan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::Unequal => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::MatchPattern => "~=",
        }
    }

    /// Recognizes a single operator token at the start of `input`.
    pub fn parse(input: &str) -> IResult<&str, Operator> {
        alt((
            map(tag("=="), |_| Operator::Equal),
            map(tag("!="), |_| Operator::Unequal),
            map(tag(">="), |_| Operator::GreaterOrEqual),
            map(tag("<="), |_| Operator::LessOrEqual),
            map(tag("~="), |_| Operator::MatchPattern),
            map(tag(">"), |_| Operator::GreaterThan),
            map(tag("<"), |_| Operator::LessThan),
        ))(input)
    }

    /// Operators that compare by order and therefore need a single
    /// date, number or numeric string on the right hand side.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::LessThan
                | Operator::GreaterOrEqual
                | Operator::LessOrEqual
        )
    }

    pub fn accepts_list(&self) -> bool {
        matches!(
            self,
            Operator::Equal | Operator::Unequal | Operator::MatchPattern
        )
    }

    pub fn accepts_range(&self) -> bool {
        matches!(self, Operator::Equal | Operator::Unequal)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = FilipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Operator::parse(s) {
            Ok(("", op)) => Ok(op),
            _ => Err(FilipError::InvalidOperator(format!(
                "'{}' is not a comparison operator",
                s
            ))),
        }
    }
}

impl TryFrom<&str> for Operator {
    type Error = FilipError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Operator {
    type Error = FilipError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&String> for Operator {
    type Error = FilipError;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::Operator;

    #[test]
    fn parse_test() {
        assert_eq!(Operator::parse("=="), Ok(("", Operator::Equal)));
        assert_eq!(Operator::parse("!="), Ok(("", Operator::Unequal)));
        assert_eq!(Operator::parse(">"), Ok(("", Operator::GreaterThan)));
        assert_eq!(Operator::parse("<"), Ok(("", Operator::LessThan)));
        assert_eq!(Operator::parse(">="), Ok(("", Operator::GreaterOrEqual)));
        assert_eq!(Operator::parse("<="), Ok(("", Operator::LessOrEqual)));
        assert_eq!(Operator::parse("~="), Ok(("", Operator::MatchPattern)));
        assert_eq!(Operator::parse(">=5"), Ok(("5", Operator::GreaterOrEqual)));
    }

    #[test]
    fn from_str_rejects_unknown_tokens() {
        assert_eq!(">=".parse::<Operator>().unwrap(), Operator::GreaterOrEqual);
        assert!("=".parse::<Operator>().is_err());
        assert!("=>".parse::<Operator>().is_err());
        assert!("== ".parse::<Operator>().is_err());
        assert!("".parse::<Operator>().is_err());
    }

    #[test]
    fn priority_tries_long_tokens_first() {
        let position = |op| Operator::PRIORITY.iter().position(|o| *o == op).unwrap();
        assert!(position(Operator::GreaterOrEqual) < position(Operator::GreaterThan));
        assert!(position(Operator::LessOrEqual) < position(Operator::LessThan));
        assert_eq!(Operator::PRIORITY.len(), 7);
    }

    #[test]
    fn grammar_classes() {
        for op in Operator::PRIORITY {
            assert_eq!(op.is_ordering(), !op.accepts_list());
        }
        assert!(Operator::Equal.accepts_range());
        assert!(Operator::Unequal.accepts_range());
        assert!(!Operator::MatchPattern.accepts_range());
        assert!(!Operator::LessThan.accepts_range());
    }

    #[test]
    fn serde_uses_token() {
        let json = serde_json::to_string(&Operator::LessOrEqual).unwrap();
        assert_eq!(json, "\"<=\"");
        let op: Operator = serde_json::from_str("\"~=\"").unwrap();
        assert_eq!(op, Operator::MatchPattern);
        assert!(serde_json::from_str::<Operator>("\"<>\"").is_err());
    }
}
