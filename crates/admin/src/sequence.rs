//! Request sequencing for overlapping fetches.
//!
//! Each logical fetch takes a [`Ticket`] before its request is sent. When the
//! response arrives it is applied only if no newer ticket was issued in the
//! meantime, so the last request issued wins rather than the last response
//! to resolve.

use std::sync::atomic::{AtomicU64, Ordering};

/// Whether a fetch result reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was the latest and replaced the dataset.
    Applied,
    /// A newer fetch was issued while this one was in flight; its response
    /// was dropped.
    Superseded,
}

impl FetchOutcome {
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Monotonic counter issuing tickets for one kind of fetch.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

/// Proof that a request was issued at a given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestSequence {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Issue a ticket newer than every ticket issued before.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` is still the newest one.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}
