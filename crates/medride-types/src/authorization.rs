use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for an authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorizationId(pub Uuid);

impl AuthorizationId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for AuthorizationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AuthorizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AuthorizationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A voucher entitling a patient to a bounded number of trips at a rate.
///
/// Read-only input to service creation. The registry copies the voucher
/// fields into each record it creates but never consumes quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    pub id: AuthorizationId,
    pub voucher_ref: String,
    pub voucher_date: NaiveDate,
    /// Tariff code the trips are billed at (e.g. "TR-URB-01").
    pub rate_code: String,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub total_trips: u32,
    pub used_trips: u32,
}

impl Authorization {
    /// Trips left on the voucher.
    pub fn available(&self) -> u32 {
        self.total_trips.saturating_sub(self.used_trips)
    }

    /// Whether `date` falls inside the validity window (inclusive).
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.valid_from <= date && date <= self.valid_until
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Authorization {
        Authorization {
            id: AuthorizationId::new(),
            voucher_ref: "AUT-2024-0001".to_string(),
            voucher_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            rate_code: "TR-URB-01".to_string(),
            valid_from: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            valid_until: NaiveDate::from_ymd_opt(2024, 7, 31).unwrap(),
            total_trips: 10,
            used_trips: 3,
        }
    }

    #[test]
    fn test_available_trips() {
        assert_eq!(sample().available(), 7);
    }

    #[test]
    fn test_available_saturates() {
        let mut auth = sample();
        auth.used_trips = 12;
        assert_eq!(auth.available(), 0);
    }

    #[test]
    fn test_validity_window_inclusive() {
        let auth = sample();
        assert!(auth.is_valid_on(auth.valid_from));
        assert!(auth.is_valid_on(auth.valid_until));
        assert!(!auth.is_valid_on(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()));
    }
}
