//! Application state wiring the registry to its collaborators.
//!
//! The registry is generic over its repository; AppState pins it to the
//! in-memory implementation and seeds it with the mock data set.

use std::sync::Arc;

use medride_core::service::registry::ServiceRegistry;
use medride_infra::catalog::AuthorizationCatalog;
use medride_infra::config::{load_config, resolve_data_dir};
use medride_infra::fixtures;
use medride_infra::memory::InMemoryServiceRepository;
use medride_types::config::TransitionPolicy;

/// Concrete registry type used by every command.
pub type ConcreteRegistry = ServiceRegistry<InMemoryServiceRepository>;

/// Shared application state.
pub struct AppState {
    pub registry: Arc<ConcreteRegistry>,
    pub catalog: AuthorizationCatalog,
}

impl AppState {
    /// Load config, build the registry and seed it with fixtures.
    ///
    /// `strict` forces the strict transition policy regardless of config.
    pub async fn init(strict: bool) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let mut config = load_config(&data_dir).await;
        if strict {
            config.transition_policy = TransitionPolicy::Strict;
        }

        let registry = ServiceRegistry::new(InMemoryServiceRepository::new(), &config);
        registry.seed(fixtures::services(&config.locale)).await?;

        let catalog = AuthorizationCatalog::from_authorizations(fixtures::authorizations());

        tracing::debug!(
            data_dir = %data_dir.display(),
            policy = ?config.transition_policy,
            highlight_ttl_ms = config.highlight_ttl_ms,
            "application state ready"
        );

        Ok(Self {
            registry: Arc::new(registry),
            catalog,
        })
    }
}
