//! Display number generation (`SRV-000001`, `SRV-000002`, ...).

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic generator of human-readable service numbers.
#[derive(Debug)]
pub struct NumberSequence {
    prefix: String,
    next: AtomicU64,
}

impl NumberSequence {
    pub fn new(prefix: impl Into<String>, start: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(start),
        }
    }

    /// Hand out the next number, or `None` once the sequence is used up.
    pub fn next_number(&self) -> Option<String> {
        let seq = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
            .ok()?;
        Some(format_number(&self.prefix, seq))
    }

    /// Value the next call to [`next_number`](Self::next_number) will use.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }

    /// Move the sequence past `seq` so seeded numbers are never reissued.
    pub fn advance_past(&self, seq: u64) {
        self.next.fetch_max(seq.saturating_add(1), Ordering::Relaxed);
    }
}

/// Format a sequence value with a prefix, zero-padded to six digits.
pub fn format_number(prefix: &str, seq: u64) -> String {
    if prefix.is_empty() {
        format!("{seq:06}")
    } else {
        format!("{prefix}-{seq:06}")
    }
}

/// Extract the sequence value from a number produced with `prefix`.
pub fn parse_number(prefix: &str, number: &str) -> Option<u64> {
    let digits = if prefix.is_empty() {
        number
    } else {
        number.strip_prefix(prefix)?.strip_prefix('-')?
    };
    digits.parse().ok()
}
