//! Service record repository trait definition.

use medride_types::error::RepositoryError;
use medride_types::service::{ServiceId, ServiceRecord, ServiceStatus};

/// Filter criteria for listing service records.
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    /// Filter by lifecycle status.
    pub status: Option<ServiceStatus>,
    /// Filter by the voucher the record was created from.
    pub voucher_ref: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl ServiceFilter {
    /// Whether `record` passes every criterion except `limit`.
    pub fn matches(&self, record: &ServiceRecord) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(ref voucher_ref) = self.voucher_ref {
            if &record.voucher_ref != voucher_ref {
                return false;
            }
        }
        true
    }
}

/// Repository trait for service record storage.
///
/// Records are kept in registry order: most recently created first.
/// Implementations live in medride-infra (e.g., InMemoryServiceRepository).
pub trait ServiceRepository: Send + Sync {
    /// Insert records ahead of every existing record, keeping their relative order.
    ///
    /// Fails with `Conflict` if any id is already stored.
    fn prepend(
        &self,
        records: &[ServiceRecord],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a record by its id.
    fn get(
        &self,
        id: &ServiceId,
    ) -> impl std::future::Future<Output = Result<Option<ServiceRecord>, RepositoryError>> + Send;

    /// List records in registry order with optional filtering.
    fn list(
        &self,
        filter: Option<ServiceFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<ServiceRecord>, RepositoryError>> + Send;

    /// Replace the stored record with the same id, keeping its position.
    ///
    /// Returns `false` (and stores nothing) when the id is unknown.
    fn replace(
        &self,
        record: &ServiceRecord,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Number of stored records.
    fn count(&self) -> impl std::future::Future<Output = Result<usize, RepositoryError>> + Send;
}
