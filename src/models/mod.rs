//! NGSI-v2 data models.

pub mod data_type;
pub mod entity;
pub mod validators;

pub use data_type::DataType;
pub use entity::{ContextAttribute, ContextEntity, ContextMetadata};
