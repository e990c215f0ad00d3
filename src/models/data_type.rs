use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FilipError;
use crate::models::validators::validate_fiware_str;

/// NGSI-v2 attribute types. Anything not listed is kept as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    Boolean,
    Number,
    Float,
    Integer,
    DateTime,
    #[default]
    Text,
    StructuredValue,
    Array,
    Object,
    Relationship,
    GeoJson,
    GeoPoint,
    Command,
    CommandResult,
    CommandStatus,
    Custom(String),
}

impl DataType {
    pub fn as_str(&self) -> &str {
        match self {
            DataType::Boolean => "Boolean",
            DataType::Number => "Number",
            DataType::Float => "Float",
            DataType::Integer => "Integer",
            DataType::DateTime => "DateTime",
            DataType::Text => "Text",
            DataType::StructuredValue => "StructuredValue",
            DataType::Array => "Array",
            DataType::Object => "Object",
            DataType::Relationship => "Relationship",
            DataType::GeoJson => "geo:json",
            DataType::GeoPoint => "geo:point",
            DataType::Command => "command",
            DataType::CommandResult => "commandResult",
            DataType::CommandStatus => "commandStatus",
            DataType::Custom(name) => name,
        }
    }
}

impl FromStr for DataType {
    type Err = FilipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Boolean" => DataType::Boolean,
            "Number" => DataType::Number,
            "Float" => DataType::Float,
            "Integer" => DataType::Integer,
            "DateTime" => DataType::DateTime,
            "Text" => DataType::Text,
            "StructuredValue" => DataType::StructuredValue,
            "Array" => DataType::Array,
            "Object" => DataType::Object,
            "Relationship" => DataType::Relationship,
            "geo:json" => DataType::GeoJson,
            "geo:point" => DataType::GeoPoint,
            "command" => DataType::Command,
            "commandResult" => DataType::CommandResult,
            "commandStatus" => DataType::CommandStatus,
            other => {
                validate_fiware_str(other)?;
                DataType::Custom(other.to_string())
            }
        })
    }
}

impl TryFrom<String> for DataType {
    type Error = FilipError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        data_type.as_str().to_string()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
