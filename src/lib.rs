//! FiLiP: client-side building blocks for the FIWARE context-management
//! platform.
//!
//! * [`ql`] parses and serializes Simple Query Language filters.
//! * [`models`] holds the NGSI-v2 entity and attribute types.
//! * [`clients`] builds Context Broker requests around them.
//! * [`units`] is the unit table behind `unitCode` metadata.

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod ql;
pub mod units;


pub use config::Settings;
pub use error::{FilipError, Result};
pub use ql::{IntoStatement, Operator, Query, Statement, Value};
