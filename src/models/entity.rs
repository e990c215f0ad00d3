use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::error::{FilipError, Result};
use crate::models::{
    data_type::DataType,
    validators::{validate_attribute_name, validate_fiware_str},
};
use crate::units::UnitIndex;

pub const UNIT_CODE_METADATA: &str = "unitCode";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMetadata {
    #[serde(rename = "type", default)]
    pub data_type: DataType,
    #[serde(default)]
    pub value: JsonValue,
}

impl ContextMetadata {
    pub fn new(data_type: DataType, value: impl Into<JsonValue>) -> Self {
        ContextMetadata {
            data_type,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextAttribute {
    #[serde(rename = "type", default)]
    pub data_type: DataType,
    #[serde(default)]
    pub value: JsonValue,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, ContextMetadata>,
}

impl ContextAttribute {
    pub fn new(data_type: DataType, value: impl Into<JsonValue>) -> Self {
        ContextAttribute {
            data_type,
            value: value.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, name: &str, metadata: ContextMetadata) -> Result<Self> {
        validate_attribute_name(name)?;
        self.metadata.insert(name.to_string(), metadata);
        Ok(self)
    }

    /// Checks that the value has the shape its declared type promises.
    /// Null is accepted for every type.
    pub fn check_value(&self) -> Result<()> {
        let value = &self.value;
        let ok = match self.data_type {
            _ if value.is_null() => true,
            DataType::Boolean => value.is_boolean(),
            DataType::Number | DataType::Float => value.is_number(),
            DataType::Integer => value.is_i64() || value.is_u64(),
            DataType::Text => value.is_string(),
            DataType::DateTime => value
                .as_str()
                .map(|text| DateTime::parse_from_rfc3339(text).is_ok())
                .unwrap_or(false),
            DataType::Relationship => value
                .as_str()
                .map(|text| validate_fiware_str(text).is_ok())
                .unwrap_or(false),
            DataType::Array => value.is_array(),
            DataType::Object | DataType::StructuredValue | DataType::GeoJson => {
                value.is_object() || value.is_array()
            }
            _ => true,
        };
        if ok {
            Ok(())
        } else {
            Err(FilipError::Validation(format!(
                "value {} does not match type '{}'",
                value, self.data_type
            )))
        }
    }

    /// A `unitCode` metadata entry must name a known unit.
    pub fn validate_units(&self, units: &UnitIndex) -> Result<()> {
        match self.metadata.get(UNIT_CODE_METADATA) {
            None => Ok(()),
            Some(metadata) => match metadata.value.as_str() {
                Some(code) => units.validate_code(code).map(|_| ()),
                None => Err(FilipError::Validation(format!(
                    "{} must be a string, got {}",
                    UNIT_CODE_METADATA, metadata.value
                ))),
            },
        }
    }
}

/// NGSI-v2 context entity in normalized representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(flatten)]
    attrs: BTreeMap<String, ContextAttribute>,
}

impl ContextEntity {
    pub fn new(id: impl Into<String>, entity_type: impl Into<String>) -> Result<Self> {
        let entity = ContextEntity {
            id: id.into(),
            entity_type: entity_type.into(),
            attrs: BTreeMap::new(),
        };
        validate_fiware_str(&entity.id)?;
        validate_fiware_str(&entity.entity_type)?;
        Ok(entity)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entity: ContextEntity = serde_json::from_str(json)?;
        entity.validate()?;
        Ok(entity)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        validate_fiware_str(&self.id)?;
        validate_fiware_str(&self.entity_type)?;
        for (name, attr) in &self.attrs {
            validate_attribute_name(name)?;
            attr.check_value()?;
        }
        Ok(())
    }

    /// Adds or replaces an attribute.
    pub fn add_attribute(&mut self, name: &str, attr: ContextAttribute) -> Result<()> {
        validate_attribute_name(name)?;
        attr.check_value()?;
        self.attrs.insert(name.to_string(), attr);
        Ok(())
    }

    pub fn get_attribute(&self, name: &str) -> Result<&ContextAttribute> {
        self.attrs.get(name).ok_or_else(|| {
            FilipError::NotFound(format!("entity '{}' has no attribute '{}'", self.id, name))
        })
    }

    pub fn delete_attribute(&mut self, name: &str) -> Result<ContextAttribute> {
        let id = &self.id;
        self.attrs.remove(name).ok_or_else(|| {
            FilipError::NotFound(format!("entity '{}' has no attribute '{}'", id, name))
        })
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }

    pub fn attributes(&self) -> &BTreeMap<String, ContextAttribute> {
        &self.attrs
    }

    pub fn get_properties(&self) -> Vec<(&str, &ContextAttribute)> {
        self.attrs
            .iter()
            .filter(|(_, attr)| attr.data_type != DataType::Relationship)
            .map(|(name, attr)| (name.as_str(), attr))
            .collect()
    }

    pub fn get_relationships(&self) -> Vec<(&str, &ContextAttribute)> {
        self.attrs
            .iter()
            .filter(|(_, attr)| attr.data_type == DataType::Relationship)
            .map(|(name, attr)| (name.as_str(), attr))
            .collect()
    }

    pub fn validate_units(&self, units: &UnitIndex) -> Result<()> {
        self.attrs.values().try_for_each(|attr| attr.validate_units(units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;
    use serde_json::json;

    fn room() -> ContextEntity {
        let mut entity = ContextEntity::new("urn:ngsi-ld:Room:001", "Room").unwrap();
        entity
            .add_attribute("temperature", ContextAttribute::new(DataType::Number, 21.5))
            .unwrap();
        entity
            .add_attribute(
                "refBuilding",
                ContextAttribute::new(DataType::Relationship, "urn:ngsi-ld:Building:1"),
            )
            .unwrap();
        entity
    }

    #[test]
    fn new_validates_id_and_type() {
        assert!(ContextEntity::new("Room 1", "Room").is_err());
        assert!(ContextEntity::new("Room1", "").is_err());
        assert!(ContextEntity::new("Room1", "Room").is_ok());
    }

    #[test]
    fn attribute_crud() {
        let mut entity = room();
        assert_eq!(entity.attribute_names().collect::<Vec<_>>(), vec!["refBuilding", "temperature"]);
        assert_eq!(entity.get_attribute("temperature").unwrap().value, json!(21.5));
        assert!(matches!(entity.get_attribute("pressure"), Err(FilipError::NotFound(_))));

        assert!(entity.add_attribute("id", ContextAttribute::new(DataType::Text, "x")).is_err());
        assert!(entity
            .add_attribute("count", ContextAttribute::new(DataType::Integer, "three"))
            .is_err());

        let removed = entity.delete_attribute("temperature").unwrap();
        assert_eq!(removed.data_type, DataType::Number);
        assert!(matches!(entity.delete_attribute("temperature"), Err(FilipError::NotFound(_))));
    }

    #[test]
    fn properties_and_relationships() {
        let entity = room();
        let properties = entity.get_properties();
        let relationships = entity.get_relationships();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].0, "temperature");
        assert_eq!(relationships.len(), 1);
        assert_eq!(relationships[0].0, "refBuilding");
    }

    #[test]
    fn check_value_test() {
        assert!(ContextAttribute::new(DataType::Boolean, true).check_value().is_ok());
        assert!(ContextAttribute::new(DataType::Boolean, 1).check_value().is_err());
        assert!(ContextAttribute::new(DataType::Integer, 3).check_value().is_ok());
        assert!(ContextAttribute::new(DataType::Integer, 3.5).check_value().is_err());
        assert!(ContextAttribute::new(DataType::DateTime, "2024-03-14T12:00:00Z")
            .check_value()
            .is_ok());
        assert!(ContextAttribute::new(DataType::DateTime, "yesterday").check_value().is_err());
        assert!(ContextAttribute::new(DataType::Text, JsonValue::Null).check_value().is_ok());
        assert!(ContextAttribute::new(DataType::Custom("Temp".into()), json!({"a": 1}))
            .check_value()
            .is_ok());
    }

    #[test]
    fn json_round_trip() {
        let entity = room();
        let json = entity.to_json().unwrap();
        let value: JsonValue = serde_json::from_str(&json).unwrap();
        assert_eq!(value["id"], json!("urn:ngsi-ld:Room:001"));
        assert_eq!(value["type"], json!("Room"));
        assert_eq!(value["temperature"], json!({"type": "Number", "value": 21.5}));
        assert_eq!(ContextEntity::from_json(&json).unwrap(), entity);
    }

    #[test]
    fn from_json_validates() {
        let json = r#"{"id": "Room1", "type": "Room", "type ": {"type": "Text", "value": "x"}}"#;
        assert!(ContextEntity::from_json(json).is_err());
        let json = r#"{"id": "Room1", "type": "Room", "pressure": {"type": "Number", "value": "high"}}"#;
        assert!(ContextEntity::from_json(json).is_err());
    }

    #[test]
    fn unit_code_metadata() {
        let units = UnitIndex::from_units(vec![Unit {
            code: "CEL".to_string(),
            name: "degree Celsius".to_string(),
            symbol: Some("°C".to_string()),
            conversion_factor: None,
            description: None,
        }])
        .unwrap();

        let attr = ContextAttribute::new(DataType::Number, 20)
            .with_metadata(UNIT_CODE_METADATA, ContextMetadata::new(DataType::Text, "CEL"))
            .unwrap();
        assert!(attr.validate_units(&units).is_ok());

        let mut entity = ContextEntity::new("Room1", "Room").unwrap();
        entity.add_attribute("temperature", attr).unwrap();
        assert!(entity.validate_units(&units).is_ok());

        let attr = ContextAttribute::new(DataType::Number, 20)
            .with_metadata(UNIT_CODE_METADATA, ContextMetadata::new(DataType::Text, "FAH"))
            .unwrap();
        assert!(matches!(attr.validate_units(&units), Err(FilipError::UnknownUnit(_))));

        let attr = ContextAttribute::new(DataType::Number, 20)
            .with_metadata(UNIT_CODE_METADATA, ContextMetadata::new(DataType::Number, 1))
            .unwrap();
        assert!(matches!(attr.validate_units(&units), Err(FilipError::Validation(_))));
    }
}
