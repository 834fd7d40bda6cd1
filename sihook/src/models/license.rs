//! License registry entries and the openness snapshot

use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::services::catalog_client::LicenseRegistry;

const APPROVED: &str = "approved";

/// License as listed by the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LicenseRecord {
    pub id: String,
    #[serde(default)]
    pub od_conformance: Option<String>,
    #[serde(default)]
    pub osd_conformance: Option<String>,
    /// Legacy flag still reported by older registries
    #[serde(default)]
    pub is_okd_compliant: Option<bool>,
    /// Legacy flag still reported by older registries
    #[serde(default)]
    pub is_osi_compliant: Option<bool>,
}

impl LicenseRecord {
    /// Open when approved by either conformance registry
    pub fn is_open(&self) -> bool {
        self.od_conformance.as_deref() == Some(APPROVED)
            || self.osd_conformance.as_deref() == Some(APPROVED)
            || self.is_okd_compliant == Some(true)
            || self.is_osi_compliant == Some(true)
    }
}

/// Immutable map from license id to openness
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseOpenness {
    licenses: HashMap<String, bool>,
}

impl LicenseOpenness {
    pub fn from_records(records: &[LicenseRecord]) -> Self {
        records
            .iter()
            .map(|record| (record.id.clone(), record.is_open()))
            .collect()
    }

    /// Load a snapshot from the registry
    ///
    /// A failing registry yields an empty snapshot, so every license is
    /// then treated as unknown.
    pub async fn load(registry: &dyn LicenseRegistry) -> Self {
        match registry.license_list().await {
            Ok(records) => {
                let openness = Self::from_records(&records);
                info!(licenses = openness.len(), "Loaded license openness");
                openness
            }
            Err(e) => {
                warn!(error = %e, "License registry unavailable, continuing without licenses");
                Self::default()
            }
        }
    }

    /// Openness of a license; `None` when the id is unknown
    pub fn get(&self, license_id: &str) -> Option<bool> {
        self.licenses.get(license_id).copied()
    }

    pub fn len(&self) -> usize {
        self.licenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty()
    }
}

impl FromIterator<(String, bool)> for LicenseOpenness {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            licenses: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn license(id: &str, od: &str, osd: &str) -> LicenseRecord {
        LicenseRecord {
            id: id.to_string(),
            od_conformance: Some(od.to_string()),
            osd_conformance: Some(osd.to_string()),
            ..LicenseRecord::default()
        }
    }

    #[test]
    fn test_openness_from_conformance() {
        let openness = LicenseOpenness::from_records(&[
            license("cc-by", "approved", "not reviewed"),
            license("mit", "not reviewed", "approved"),
            license("proprietary", "not reviewed", "rejected"),
        ]);

        assert_eq!(openness.get("cc-by"), Some(true));
        assert_eq!(openness.get("mit"), Some(true));
        assert_eq!(openness.get("proprietary"), Some(false));
        assert_eq!(openness.get("unknown"), None);
        assert_eq!(openness.len(), 3);
    }

    #[test]
    fn test_legacy_flags_count_as_open() {
        let record = LicenseRecord {
            id: "odc-by".to_string(),
            is_okd_compliant: Some(true),
            ..LicenseRecord::default()
        };
        assert!(record.is_open());
    }
}
