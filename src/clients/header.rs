use serde::{Deserialize, Serialize};

use crate::error::{FilipError, Result};

pub const SERVICE_HEADER: &str = "fiware-service";
pub const SERVICE_PATH_HEADER: &str = "fiware-servicepath";

const MAX_SERVICE_LEN: usize = 50;
const MAX_PATH_SEGMENT_LEN: usize = 50;
const MAX_PATH_LEVELS: usize = 10;

/// Tenant and scope sent with every Context Broker request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiwareHeader {
    #[serde(default)]
    service: String,
    #[serde(default = "default_service_path")]
    service_path: String,
}

fn default_service_path() -> String {
    "/".to_string()
}

impl Default for FiwareHeader {
    fn default() -> Self {
        FiwareHeader {
            service: String::new(),
            service_path: default_service_path(),
        }
    }
}

impl FiwareHeader {
    pub fn new(service: impl Into<String>, service_path: impl Into<String>) -> Result<Self> {
        let header = FiwareHeader {
            service: service.into(),
            service_path: service_path.into(),
        };
        validate_service(&header.service)?;
        validate_service_path(&header.service_path)?;
        Ok(header)
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn service_path(&self) -> &str {
        &self.service_path
    }

    /// Header pairs to attach to a request. An empty service selects the
    /// default tenant and is left out.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::with_capacity(2);
        if !self.service.is_empty() {
            headers.push((SERVICE_HEADER, self.service.clone()));
        }
        headers.push((SERVICE_PATH_HEADER, self.service_path.clone()));
        headers
    }
}

pub fn validate_service(service: &str) -> Result<()> {
    if service.len() > MAX_SERVICE_LEN {
        return Err(FilipError::Validation(format!(
            "service '{}' is longer than {} characters",
            service, MAX_SERVICE_LEN
        )));
    }
    if !service
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(FilipError::Validation(format!(
            "service '{}' may only contain lower case letters, digits and '_'",
            service
        )));
    }
    Ok(())
}

/// Accepts `/`, `/a/b`, `/a/#` and comma separated lists of those.
pub fn validate_service_path(service_path: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(FilipError::Validation(format!(
            "service path '{}' {}",
            service_path, reason
        )))
    };

    for entry in service_path.split(',') {
        let Some(rest) = entry.strip_prefix('/') else {
            return invalid("must start with '/'");
        };
        if rest.is_empty() {
            continue;
        }
        let segments: Vec<&str> = rest.split('/').collect();
        if segments.len() > MAX_PATH_LEVELS {
            return invalid("has too many levels");
        }
        for (i, segment) in segments.iter().enumerate() {
            if *segment == "#" && i == segments.len() - 1 {
                continue;
            }
            if segment.is_empty() || segment.len() > MAX_PATH_SEGMENT_LEN {
                return invalid("has an empty or overlong segment");
            }
            if !segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return invalid("may only contain letters, digits and '_'");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_header() {
        let header = FiwareHeader::default();
        assert_eq!(header.service(), "");
        assert_eq!(header.service_path(), "/");
        assert_eq!(header.headers(), vec![(SERVICE_PATH_HEADER, "/".to_string())]);
    }

    #[test]
    fn headers_test() {
        let header = FiwareHeader::new("smart_city", "/districts/north").unwrap();
        assert_eq!(
            header.headers(),
            vec![
                (SERVICE_HEADER, "smart_city".to_string()),
                (SERVICE_PATH_HEADER, "/districts/north".to_string()),
            ]
        );
    }

    #[test]
    fn service_rules() {
        assert!(validate_service("").is_ok());
        assert!(validate_service("tenant_1").is_ok());
        assert!(validate_service("Tenant").is_err());
        assert!(validate_service("ten-ant").is_err());
        assert!(validate_service(&"a".repeat(51)).is_err());
    }

    #[test]
    fn service_path_rules() {
        for ok in ["/", "/a", "/a/b_c", "/a/#", "/#", "/a,/b/c", "/a/b/c/d/e/f/g/h/i/j"] {
            assert!(validate_service_path(ok).is_ok(), "{} should be valid", ok);
        }
        for bad in ["", "a", "/a/", "/a//b", "/a-b", "/#/a", "/a,b", "/a/b/c/d/e/f/g/h/i/j/k"] {
            assert!(validate_service_path(bad).is_err(), "{} should be invalid", bad);
        }
        assert!(validate_service_path(&format!("/{}", "a".repeat(51))).is_err());
    }

    #[test]
    fn serde_defaults() {
        let header: FiwareHeader = serde_json::from_str(r#"{"service": "city"}"#).unwrap();
        assert_eq!(header.service_path(), "/");
    }
}
