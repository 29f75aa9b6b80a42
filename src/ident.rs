//! Three-part composite identifiers
//!
//! Where only one identifier slot is available, an integration is persisted as
//! `organization/provider_key/internal_id`. Sentry slugs, provider keys and
//! integration ids never contain `/`, and [`CompositeId::encode`] refuses
//! parts that do, so decoding is always unambiguous.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ReconcileError, Result};

pub const DELIMITER: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompositeId(String);

impl CompositeId {
    pub fn encode(organization: &str, provider_key: &str, internal_id: &str) -> Result<Self> {
        for (field, part) in [
            ("organization", organization),
            ("provider_key", provider_key),
            ("internal_id", internal_id),
        ] {
            if part.contains(DELIMITER) {
                return Err(ReconcileError::malformed_id(
                    part,
                    format!("{} must not contain {:?}", field, DELIMITER),
                ));
            }
        }
        Ok(Self(format!(
            "{organization}{DELIMITER}{provider_key}{DELIMITER}{internal_id}"
        )))
    }

    /// Split back into `(organization, provider_key, internal_id)`
    pub fn decode(&self) -> (&str, &str, &str) {
        let mut parts = self.0.splitn(3, DELIMITER);
        // Construction guarantees exactly three parts
        let organization = parts.next().unwrap_or_default();
        let provider_key = parts.next().unwrap_or_default();
        let internal_id = parts.next().unwrap_or_default();
        (organization, provider_key, internal_id)
    }

    pub fn internal_id(&self) -> &str {
        self.decode().2
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CompositeId {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self> {
        let count = s.split(DELIMITER).count();
        if count != 3 {
            return Err(ReconcileError::malformed_id(s, format!("expected 3 parts, got {}", count)));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for CompositeId {
    type Error = ReconcileError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CompositeId> for String {
    fn from(id: CompositeId) -> Self {
        id.0
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
