use crate::error::{FilipError, Result};

pub const MAX_FIWARE_STR_LEN: usize = 256;

/// Characters the Context Broker refuses in ids, types and names.
pub const FORBIDDEN_CHARS: &[char] = &['?', '&', '#', '/', '"', '\'', '<', '>', '=', ';', '(', ')'];

/// Attribute names the NGSI-v2 API reserves for itself.
pub const RESERVED_ATTRIBUTE_NAMES: &[&str] = &[
    "id",
    "type",
    "geo:location",
    "dateCreated",
    "dateModified",
    "dateExpires",
    "*",
];

pub fn validate_fiware_str(value: &str) -> Result<()> {
    if value.is_empty() || value.len() > MAX_FIWARE_STR_LEN {
        return Err(FilipError::Validation(format!(
            "'{}' must be between 1 and {} characters long",
            value, MAX_FIWARE_STR_LEN
        )));
    }
    if let Some(c) = value.chars().find(|&c| {
        !c.is_ascii() || c.is_ascii_control() || c.is_ascii_whitespace() || FORBIDDEN_CHARS.contains(&c)
    }) {
        return Err(FilipError::Validation(format!(
            "'{}' contains the forbidden character {:?}",
            value, c
        )));
    }
    Ok(())
}

pub fn validate_attribute_name(name: &str) -> Result<()> {
    validate_fiware_str(name)?;
    if RESERVED_ATTRIBUTE_NAMES.contains(&name) {
        return Err(FilipError::Validation(format!(
            "'{}' is a reserved attribute name",
            name
        )));
    }
    Ok(())
}
