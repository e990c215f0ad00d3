//! Simple Query Language
//!
//! Filter expressions for the `q` and `mq` parameters of NGSI list
//! requests. A query is a `;` separated list of statements that are all
//! required to hold.
//!
//! ```text
//! temperature>40
//! temperature>40;color==black,red
//! temperature!=10..20
//! name~=^Room
//! ```
//!
//! | Operator | Right hand side |
//! |----------|-----------------|
//! | `==`, `!=` | value, list `a,b,c` or range `min..max` |
//! | `~=` | pattern or list |
//! | `>`, `<`, `>=`, `<=` | a single number, numeric string or date |

pub mod operator;
pub mod parser_utils;
pub mod query;
pub mod statement;
pub mod value;

pub use operator::Operator;
pub use query::Query;
pub use statement::{IntoStatement, Statement};
pub use value::Value;
