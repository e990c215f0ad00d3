use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{FilipError, Result};
use crate::ql::statement::{IntoStatement, Statement};

pub const STATEMENT_SEPARATOR: char = ';';

/// AND-combined, de-duplicated list of statements, as sent in the `q` and
/// `mq` parameters of the Context Broker.
///
/// Insertion order is kept; a statement that is already present is not
/// added a second time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query {
    statements: Vec<Statement>,
}

fn normalize<I, S>(items: I) -> Result<Vec<Statement>>
where
    I: IntoIterator<Item = S>,
    S: IntoStatement,
{
    items.into_iter().map(IntoStatement::into_statement).collect()
}

fn dedup(statements: &mut Vec<Statement>) {
    let mut seen = HashSet::with_capacity(statements.len());
    statements.retain(|statement| seen.insert(statement.clone()));
}

impl Query {
    pub fn new<I, S>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: IntoStatement,
    {
        let mut statements = normalize(items)?;
        dedup(&mut statements);
        Ok(Query { statements })
    }

    /// Parses a full `;` separated query string.
    pub fn parse(input: &str) -> Result<Query> {
        if input.trim().is_empty() {
            return Err(FilipError::Format("query string is empty".to_string()));
        }
        let statements = input
            .split(STATEMENT_SEPARATOR)
            .map(|part| {
                if part.trim().is_empty() {
                    Err(FilipError::Format(format!(
                        "empty statement in query '{}'",
                        input
                    )))
                } else {
                    Statement::parse(part)
                }
            })
            .collect::<Result<Vec<_>>>()?;
        debug!("parsed query '{}' into {} statements", input, statements.len());
        Query::new(statements)
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn contains(&self, statement: &Statement) -> bool {
        self.statements.contains(statement)
    }

    /// Appends statements and drops any that were already present.
    ///
    /// This never replaces an existing condition on the same attribute;
    /// remove the old statement first to change it.
    pub fn update<I, S>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: IntoStatement,
    {
        let new_statements = normalize(items)?;
        self.statements.extend(new_statements);
        dedup(&mut self.statements);
        Ok(())
    }

    pub fn insert<S: IntoStatement>(&mut self, item: S) -> Result<()> {
        self.update(std::iter::once(item))
    }

    /// Removes statements by value. Fails without touching the query if
    /// any of them is not present.
    pub fn remove<I, S>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: IntoStatement,
    {
        let targets = normalize(items)?;
        if let Some(missing) = targets.iter().find(|target| !self.contains(target)) {
            return Err(FilipError::NotFound(format!(
                "statement '{}' is not part of the query",
                missing
            )));
        }
        self.statements.retain(|statement| !targets.contains(statement));
        Ok(())
    }

    pub fn remove_one<S: IntoStatement>(&mut self, item: S) -> Result<()> {
        self.remove(std::iter::once(item))
    }

    pub fn to_str(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", STATEMENT_SEPARATOR)?;
            }
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl FromStr for Query {
    type Err = FilipError;

    fn from_str(s: &str) -> Result<Self> {
        Query::parse(s)
    }
}

impl TryFrom<String> for Query {
    type Error = FilipError;

    fn try_from(value: String) -> Result<Self> {
        Query::parse(&value)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.to_string()
    }
}

impl From<Statement> for Query {
    fn from(statement: Statement) -> Self {
        Query {
            statements: vec![statement],
        }
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

impl IntoIterator for Query {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}
