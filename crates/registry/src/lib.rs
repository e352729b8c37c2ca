//! Configuration catalog: the service → function → parameter table.
//!
//! The catalog is plain data loaded once at startup. A JSON file (env
//! override or the standard config directory) may replace the built-in
//! table; anything unreadable or malformed silently falls back to the
//! built-in catalog so the console always starts.

use std::{env, path::PathBuf};

use dirs_next::config_dir;
use mocktty_types::{FunctionDefinition, ServiceDefinition};
use mocktty_util::expand_tilde;
use tracing::warn;

mod catalog;

pub use catalog::builtin_services;

/// Environment variable allowing callers to override the catalog file path.
pub const CATALOG_PATH_ENV: &str = "MOCKTTY_CATALOG_PATH";

/// Default filename for a user-provided catalog.
pub const CATALOG_FILE_NAME: &str = "catalog.json";

/// Immutable registry of the business services available for testing.
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    services: Vec<ServiceDefinition>,
}

impl ServiceRegistry {
    /// Load the catalog: a user catalog file when present and valid,
    /// otherwise the built-in table. Never fails.
    pub fn load() -> Self {
        let path = default_catalog_path();
        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<ServiceDefinition>>(&content) {
                Ok(services) if !services.is_empty() => Self { services },
                Ok(_) => {
                    warn!(path = %path.display(), "Catalog file is empty; using built-in catalog");
                    Self::builtin()
                }
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "Failed to parse catalog file; using built-in catalog");
                    Self::builtin()
                }
            },
            Err(_) => Self::builtin(),
        }
    }

    /// The hard-coded catalog.
    pub fn builtin() -> Self {
        Self {
            services: builtin_services(),
        }
    }

    /// All services, in catalog order.
    pub fn services(&self) -> &[ServiceDefinition] {
        &self.services
    }

    /// Look up a service by id.
    pub fn service(&self, service_id: &str) -> Option<&ServiceDefinition> {
        self.services.iter().find(|service| service.id == service_id)
    }

    /// Look up a function by service and function id.
    pub fn function(&self, service_id: &str, function_id: &str) -> Option<&FunctionDefinition> {
        self.service(service_id)?.function(function_id)
    }
}

/// Get the default path for a user-provided catalog file.
pub fn default_catalog_path() -> PathBuf {
    if let Ok(path) = env::var(CATALOG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mocktty")
        .join(CATALOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocktty_types::{DisplayMode, ParamKind};

    #[test]
    fn builtin_catalog_has_the_four_services() {
        let registry = ServiceRegistry::builtin();
        let ids: Vec<&str> = registry.services().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["user", "order", "product", "analytics"]);
    }

    #[test]
    fn every_service_has_at_least_one_function() {
        let registry = ServiceRegistry::builtin();
        for service in registry.services() {
            assert!(!service.functions.is_empty(), "service {} has no functions", service.id);
        }
    }

    #[test]
    fn order_query_is_auto_execute_table_with_default_order_id() {
        let registry = ServiceRegistry::builtin();
        let query = registry.function("order", "query").expect("order/query exists");
        assert!(query.auto_execute);
        assert_eq!(query.display_mode, DisplayMode::Table);
        assert_eq!(query.params[0].default_value.as_deref(), Some("ORD-2023-001"));
    }

    #[test]
    fn analytics_period_is_a_select_with_options() {
        let registry = ServiceRegistry::builtin();
        let users = registry.function("analytics", "users").expect("analytics/users exists");
        let period = &users.params[0];
        assert_eq!(period.kind, ParamKind::Select);
        assert_eq!(period.options, ["日", "周", "月", "年"]);
        assert_eq!(period.default_value.as_deref(), Some("月"));
    }

    #[test]
    fn load_falls_back_to_builtin_on_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "{ nope").unwrap();

        temp_env::with_var(CATALOG_PATH_ENV, Some(path.to_str().unwrap()), || {
            let registry = ServiceRegistry::load();
            assert_eq!(registry.services().len(), ServiceRegistry::builtin().services().len());
        });
    }

    #[test]
    fn load_honors_a_valid_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let catalog = serde_json::to_string(&builtin_services()[..1]).unwrap();
        std::fs::write(&path, catalog).unwrap();

        temp_env::with_var(CATALOG_PATH_ENV, Some(path.to_str().unwrap()), || {
            let registry = ServiceRegistry::load();
            assert_eq!(registry.services().len(), 1);
            assert_eq!(registry.services()[0].id, "user");
        });
    }
}
