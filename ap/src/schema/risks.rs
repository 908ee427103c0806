//! Risks: the one field the service may return in two shapes
//!
//! The wire form is a union of a list of `{risk, mitigation}` records and a
//! mapping of risk text to mitigation text. [`Risks::normalize`] turns either
//! into the canonical list, keeping mapping order as list order.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::error::{SchemaValidationError, check_len};

/// One risk and its mitigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskItem {
    pub risk: String,
    #[serde(default)]
    pub mitigation: String,
}

impl RiskItem {
    pub fn new(risk: impl Into<String>, mitigation: impl Into<String>) -> Self {
        Self {
            risk: risk.into(),
            mitigation: mitigation.into(),
        }
    }
}

/// Risks as returned by the generation service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Risks {
    List(Vec<RiskItem>),
    Map(RiskMap),
}

/// Ordered risk → mitigation mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskMap(pub Vec<(String, String)>);

impl<'de> Deserialize<'de> for RiskMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RiskMapVisitor;

        impl<'de> Visitor<'de> for RiskMapVisitor {
            type Value = RiskMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of risk to mitigation strings")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((risk, mitigation)) = access.next_entry::<String, String>()? {
                    entries.push((risk, mitigation));
                }
                Ok(RiskMap(entries))
            }
        }

        deserializer.deserialize_map(RiskMapVisitor)
    }
}

impl Risks {
    pub fn len(&self) -> usize {
        match self {
            Risks::List(items) => items.len(),
            Risks::Map(map) => map.0.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to the canonical list form
    ///
    /// A list is returned as-is; a mapping becomes one record per entry in
    /// mapping order.
    pub fn normalize(self) -> Vec<RiskItem> {
        match self {
            Risks::List(items) => items,
            Risks::Map(map) => map
                .0
                .into_iter()
                .map(|(risk, mitigation)| RiskItem { risk, mitigation })
                .collect(),
        }
    }

    /// Check cardinality (when bounded) and that every risk text is non-empty
    pub(crate) fn validate(
        &self,
        document: &'static str,
        path: &str,
        bounds: Option<(usize, usize)>,
    ) -> Result<(), SchemaValidationError> {
        if let Some((min, max)) = bounds {
            check_len(document, path, self.len(), min, max)?;
        }
        let empty_at = match self {
            Risks::List(items) => items
                .iter()
                .position(|r| r.risk.trim().is_empty())
                .map(|i| format!("{}[{}].risk", path, i)),
            Risks::Map(map) => map
                .0
                .iter()
                .any(|(risk, _)| risk.trim().is_empty())
                .then(|| format!("{}.<key>", path)),
        };
        match empty_at {
            Some(at) => Err(SchemaValidationError::new(document, at, "risk text must not be empty")),
            None => Ok(()),
        }
    }
}

impl From<Vec<RiskItem>> for Risks {
    fn from(items: Vec<RiskItem>) -> Self {
        Risks::List(items)
    }
}
