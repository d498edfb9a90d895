//! Backend registry.
//!
//! # Data Flow
//! ```text
//! storage_services (comma-separated)
//!     → Registry::load (ordered Vec<Backend>, identities by position)
//!     → Registry::new (every backend starts Unavailable)
//!
//! health monitor ──set_status──▶ Registry ◀──available/snapshot── router, /status
//! ```
//!
//! # Design Decisions
//! - Backend order is fixed at startup and is the round-robin base order
//! - The status key set never changes after construction
//! - Status reads and writes are per-entry; there is no global lock

pub mod backend;

use std::sync::Arc;

use dashmap::DashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::validation::{parse_endpoint, split_endpoints, ValidationError};

pub use backend::{Backend, HealthStatus};

/// Static backend list plus the live health view of every backend.
#[derive(Debug)]
pub struct Registry {
    backends: Vec<Arc<Backend>>,
    statuses: DashMap<String, HealthStatus>,
}

impl Registry {
    /// Build a registry with every backend marked `Unavailable`.
    pub fn new(backends: Vec<Backend>) -> Self {
        let statuses = backends
            .iter()
            .map(|b| (b.name.clone(), HealthStatus::Unavailable))
            .collect();

        Self {
            backends: backends.into_iter().map(Arc::new).collect(),
            statuses,
        }
    }

    /// Parse a comma-separated endpoint list into ordered backends.
    ///
    /// Blank entries are skipped before identities are assigned, so
    /// `"a,,b"` yields `storage_service_1` and `storage_service_2`. Identities are
    /// dense: a blank entry does not reserve its raw position, so `b` is
    /// never `storage_service_3`.
    pub fn load(raw: &str) -> Result<Vec<Backend>, ValidationError> {
        split_endpoints(raw)
            .into_iter()
            .enumerate()
            .map(|(index, entry)| parse_endpoint(index, entry).map(|url| Backend::new(index, url)))
            .collect()
    }

    /// Shortcut for `Registry::new(Registry::load(raw)?)`.
    pub fn from_endpoints(raw: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(Self::load(raw)?))
    }

    /// All configured backends in configuration order.
    pub fn backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Overwrite the status of a configured backend.
    ///
    /// Returns the previous status. Unknown identities are ignored.
    pub fn set_status(&self, name: &str, status: HealthStatus) -> Option<HealthStatus> {
        match self.statuses.get_mut(name) {
            Some(mut entry) => Some(std::mem::replace(entry.value_mut(), status)),
            None => {
                tracing::debug!(backend = %name, "Ignoring status update for unknown backend");
                None
            }
        }
    }

    /// Current status of a backend; unknown identities read as `Unavailable`.
    pub fn status(&self, name: &str) -> HealthStatus {
        self.statuses
            .get(name)
            .map(|entry| *entry.value())
            .unwrap_or(HealthStatus::Unavailable)
    }

    /// Backends currently classified `Available`, in configuration order.
    pub fn available(&self) -> Vec<Arc<Backend>> {
        self.backends
            .iter()
            .filter(|b| self.status(&b.name).is_available())
            .cloned()
            .collect()
    }

    /// Point-in-time copy of every status, in configuration order.
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot(
            self.backends
                .iter()
                .map(|b| (b.name.clone(), self.status(&b.name)))
                .collect(),
        )
    }
}

/// Ordered identity → status pairs.
///
/// Serializes as a JSON object, keeping configuration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSnapshot(Vec<(String, HealthStatus)>);

impl StatusSnapshot {
    pub fn get(&self, name: &str) -> Option<HealthStatus> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, s)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, HealthStatus)> {
        self.0.iter().map(|(n, s)| (n.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for StatusSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, status) in &self.0 {
            map.serialize_entry(name, status)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_empty_yields_no_backends() {
        assert!(Registry::load("").unwrap().is_empty());
        assert!(Registry::load(" , ").unwrap().is_empty());
    }

    #[test]
    fn load_keeps_order_and_assigns_identities() {
        let backends = Registry::load("http://service1, http://service2/,http://service3").unwrap();
        let names: Vec<_> = backends.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["storage_service_1", "storage_service_2", "storage_service_3"]);
        assert_eq!(backends[1].base_url(), "http://service2");
    }

    #[test]
    fn blank_entries_do_not_reserve_identities() {
        let backends = Registry::load("http://a,,http://b").unwrap();
        let names: Vec<_> = backends.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["storage_service_1", "storage_service_2"]);
        assert_eq!(backends[1].base_url(), "http://b");
    }

    #[test]
    fn load_rejects_non_http_endpoint() {
        assert!(Registry::load("http://ok,ftp://nope").is_err());
        assert!(Registry::load("not a url").is_err());
    }

    #[test]
    fn every_backend_starts_unavailable() {
        for n in [0usize, 1, 5] {
            let raw: Vec<String> = (1..=n).map(|i| format!("http://service{i}")).collect();
            let registry = Registry::from_endpoints(&raw.join(",")).unwrap();
            let snapshot = registry.snapshot();
            assert_eq!(snapshot.len(), n);
            assert!(snapshot.iter().all(|(_, s)| s == HealthStatus::Unavailable));
        }
    }

    #[test]
    fn set_status_overwrites_known_and_ignores_unknown() {
        let registry = Registry::from_endpoints("http://service1,http://service2").unwrap();

        let prev = registry.set_status("storage_service_1", HealthStatus::Available);
        assert_eq!(prev, Some(HealthStatus::Unavailable));
        assert_eq!(registry.status("storage_service_1"), HealthStatus::Available);

        assert_eq!(registry.set_status("storage_service_9", HealthStatus::Available), None);
        assert_eq!(registry.snapshot().len(), 2);
        assert_eq!(registry.snapshot().get("storage_service_9"), None);
    }

    #[test]
    fn available_preserves_configuration_order() {
        let registry = Registry::from_endpoints(
            "http://service1,http://service2,http://service3,http://service4,http://service5",
        )
        .unwrap();
        for name in ["storage_service_4", "storage_service_1", "storage_service_2"] {
            registry.set_status(name, HealthStatus::Available);
        }

        let names: Vec<_> = registry.available().iter().map(|b| b.name.clone()).collect();
        assert_eq!(names, ["storage_service_1", "storage_service_2", "storage_service_4"]);
    }

    #[test]
    fn snapshot_serializes_as_ordered_object() {
        let registry = Registry::from_endpoints("http://service1,http://service2").unwrap();
        registry.set_status("storage_service_2", HealthStatus::Available);

        let json = serde_json::to_string(&registry.snapshot()).unwrap();
        assert_eq!(
            json,
            r#"{"storage_service_1":"unavailable","storage_service_2":"available"}"#
        );
    }
}
