//! Unit reference data.
//!
//! A read-only table of UN/CEFACT unit codes used to check `unitCode`
//! metadata. The index is built once and handed to whatever validates
//! against it, so tests can use a reduced table.

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{FilipError, Result};

const BUILTIN_UNITS: &str = include_str!("units.json");

lazy_static! {
    static ref BUILTIN_INDEX: std::result::Result<UnitIndex, String> =
        UnitIndex::from_json(BUILTIN_UNITS).map_err(|err| err.to_string());
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UnitIndex {
    units: Vec<Unit>,
    by_code: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl UnitIndex {
    pub fn from_units(units: Vec<Unit>) -> Result<Self> {
        let mut by_code = HashMap::with_capacity(units.len());
        let mut by_name = HashMap::with_capacity(units.len());
        for (i, unit) in units.iter().enumerate() {
            if unit.code.is_empty() || unit.name.is_empty() {
                return Err(FilipError::Validation(format!(
                    "unit #{} needs both a code and a name",
                    i
                )));
            }
            if by_code.insert(unit.code.clone(), i).is_some() {
                return Err(FilipError::Validation(format!(
                    "duplicate unit code '{}'",
                    unit.code
                )));
            }
            if by_name.insert(unit.name.to_lowercase(), i).is_some() {
                return Err(FilipError::Validation(format!(
                    "duplicate unit name '{}'",
                    unit.name
                )));
            }
        }
        Ok(UnitIndex {
            units,
            by_code,
            by_name,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let units: Vec<Unit> = serde_json::from_str(json)?;
        let index = UnitIndex::from_units(units)?;
        debug!("loaded {} units", index.len());
        Ok(index)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        UnitIndex::from_json(&content)
    }

    /// The table shipped with the crate, parsed on first use.
    pub fn builtin() -> Result<&'static UnitIndex> {
        (*BUILTIN_INDEX)
            .as_ref()
            .map_err(|err| FilipError::Config(format!("builtin unit table: {}", err)))
    }

    pub fn by_code(&self, code: &str) -> Option<&Unit> {
        self.by_code.get(code).map(|&i| &self.units[i])
    }

    /// Case-insensitive lookup by unit name.
    pub fn by_name(&self, name: &str) -> Option<&Unit> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.units[i])
    }

    /// Looks up by code first, then by name.
    pub fn lookup(&self, key: &str) -> Option<&Unit> {
        self.by_code(key).or_else(|| self.by_name(key))
    }

    pub fn validate_code(&self, code: &str) -> Result<&Unit> {
        self.by_code(code)
            .ok_or_else(|| FilipError::UnknownUnit(format!("no unit with code '{}'", code)))
    }

    pub fn validate_name(&self, name: &str) -> Result<&Unit> {
        self.by_name(name)
            .ok_or_else(|| FilipError::UnknownUnit(format!("no unit named '{}'", name)))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|unit| unit.code.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|unit| unit.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
