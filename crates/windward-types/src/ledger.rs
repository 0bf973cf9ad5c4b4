//! The resource ledger: per-player resource balances with checked mutation.
//!
//! # Design
//!
//! - **Non-negative**: no operation can drive a balance below zero. Debits
//!   are validated against the full cost *before* any mutation; there is no
//!   clamping.
//! - **Monotonic credits**: catch-up production uses saturating addition so
//!   an arbitrarily large offline window can never fail mid-apply.
//! - **Atomic multi-resource debits**: [`ResourceLedger::debit_all`] either
//!   applies the whole cost or leaves the ledger untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Resource;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Attempted to debit more of a resource than the player holds.
    #[error("insufficient resource: wanted {requested} of {resource:?} but only have {available}")]
    InsufficientResource {
        /// The resource being debited.
        resource: Resource,
        /// The quantity the caller attempted to debit.
        requested: u64,
        /// The quantity actually held.
        available: u64,
    },
}

/// Per-player resource balances.
///
/// Serializes transparently as a `{ resource: amount }` map, matching the
/// snapshot wire format. Absent keys are zero balances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(transparent)]
pub struct ResourceLedger {
    amounts: BTreeMap<Resource, u64>,
}

impl ResourceLedger {
    /// Create an empty ledger (all balances zero).
    pub const fn new() -> Self {
        Self {
            amounts: BTreeMap::new(),
        }
    }

    /// Return the balance for a resource (zero when absent).
    pub fn amount(&self, resource: Resource) -> u64 {
        self.amounts.get(&resource).copied().unwrap_or(0)
    }

    /// Iterate over all non-zero balances in resource order.
    pub fn iter(&self) -> impl Iterator<Item = (Resource, u64)> + '_ {
        self.amounts.iter().map(|(r, q)| (*r, *q))
    }

    /// Credit `amount` units of `resource`, saturating at `u64::MAX`.
    ///
    /// Saturation (rather than an error) keeps bulk catch-up monotonic: a
    /// ledger at the ceiling simply stops growing.
    pub fn credit(&mut self, resource: Resource, amount: u64) {
        let entry = self.amounts.entry(resource).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Credit every entry of a reward map.
    pub fn credit_all(&mut self, rewards: &BTreeMap<Resource, u64>) {
        for (resource, amount) in rewards {
            self.credit(*resource, *amount);
        }
    }

    /// Check whether every entry of a cost map is affordable.
    pub fn can_afford(&self, cost: &BTreeMap<Resource, u64>) -> bool {
        cost.iter()
            .all(|(resource, amount)| self.amount(*resource) >= *amount)
    }

    /// Debit `amount` units of `resource`.
    ///
    /// Removes the key entirely when the balance reaches zero.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientResource`] without mutating when
    /// the balance is too low.
    pub fn debit(&mut self, resource: Resource, amount: u64) -> Result<(), LedgerError> {
        let available = self.amount(resource);
        let remaining =
            available
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientResource {
                    resource,
                    requested: amount,
                    available,
                })?;

        if remaining == 0 {
            self.amounts.remove(&resource);
        } else {
            self.amounts.insert(resource, remaining);
        }

        Ok(())
    }

    /// Debit every entry of a cost map atomically.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientResource`] for the first
    /// unaffordable entry; the ledger is untouched on failure.
    pub fn debit_all(&mut self, cost: &BTreeMap<Resource, u64>) -> Result<(), LedgerError> {
        for (resource, amount) in cost {
            let available = self.amount(*resource);
            if available < *amount {
                return Err(LedgerError::InsufficientResource {
                    resource: *resource,
                    requested: *amount,
                    available,
                });
            }
        }
        for (resource, amount) in cost {
            // Cannot fail: affordability was checked above.
            let _ = self.debit(*resource, *amount);
        }
        Ok(())
    }
}

impl From<BTreeMap<Resource, u64>> for ResourceLedger {
    fn from(amounts: BTreeMap<Resource, u64>) -> Self {
        Self { amounts }
    }
}

impl FromIterator<(Resource, u64)> for ResourceLedger {
    fn from_iter<I: IntoIterator<Item = (Resource, u64)>>(iter: I) -> Self {
        Self {
            amounts: iter.into_iter().collect(),
        }
    }
}
