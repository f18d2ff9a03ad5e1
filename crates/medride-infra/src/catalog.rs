//! Authorization catalog backed by `DashMap`.
//!
//! Authorizations are read-only input to service creation. The catalog only
//! looks them up; it never consumes quota. Values are cloned on read so no
//! `DashMap` guard outlives a call.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use medride_types::authorization::{Authorization, AuthorizationId};

/// Concurrent lookup table of authorizations.
///
/// Cloning produces a shared view of the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationCatalog {
    inner: Arc<DashMap<AuthorizationId, Authorization>>,
}

impl AuthorizationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of authorizations.
    pub fn from_authorizations(authorizations: impl IntoIterator<Item = Authorization>) -> Self {
        let catalog = Self::new();
        for auth in authorizations {
            catalog.insert(auth);
        }
        catalog
    }

    /// Insert or overwrite an authorization.
    pub fn insert(&self, authorization: Authorization) {
        self.inner.insert(authorization.id, authorization);
    }

    pub fn get(&self, id: &AuthorizationId) -> Option<Authorization> {
        self.inner.get(id).map(|r| r.value().clone())
    }

    /// Look up by voucher reference (case-insensitive).
    pub fn find_by_voucher(&self, voucher_ref: &str) -> Option<Authorization> {
        self.inner
            .iter()
            .find(|r| r.value().voucher_ref.eq_ignore_ascii_case(voucher_ref))
            .map(|r| r.value().clone())
    }

    /// All authorizations, ordered by voucher reference.
    pub fn list(&self) -> Vec<Authorization> {
        let mut all: Vec<Authorization> = self.inner.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| a.voucher_ref.cmp(&b.voucher_ref));
        all
    }

    /// Authorizations whose validity window covers `date`.
    pub fn valid_on(&self, date: NaiveDate) -> Vec<Authorization> {
        self.list()
            .into_iter()
            .filter(|auth| auth.is_valid_on(date))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
