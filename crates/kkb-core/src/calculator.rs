//! # Split Calculator
//!
//! Turns a [`BillState`] into what each participant owes.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         compute(bill)                                   │
//! │                                                                         │
//! │  1. participants  = distinct item owners (first appearance order)      │
//! │  2. subtotal      = Σ item prices + Σ shared item prices               │
//! │  3. service       = Percent: subtotal × value / 100                    │
//! │                     Fixed:   value                                     │
//! │  4. per person p:                                                      │
//! │       own      = Σ prices of p's items                                 │
//! │       shared   = Σ price / |shared_by| over shared items p is in       │
//! │       before   = own + shared                                          │
//! │       service  = subtotal > 0 ? before / subtotal × service : 0        │
//! │       total    = before + service                                      │
//! │  5. grand total   = subtotal + service                                 │
//! │                                                                         │
//! │  Σ person totals == grand total (within 1e-6) whenever every sharer    │
//! │  also owns an item and the subtotal is non-zero.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The service charge follows consumption: whoever ate more of the bill
//! pays more of the charge.
//!
//! ## Edge Cases Kept As-Is
//! - A sharer who owns no item gets no row; their share is unallocated.
//! - A zero subtotal with a fixed charge allocates the charge to nobody,
//!   although the grand total still includes it.

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::amount::Amount;
use crate::types::{BillState, Item};

// =============================================================================
// Result Types
// =============================================================================

/// One participant's slice of a shared item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SharedShare {
    pub name: String,
    /// Full price of the shared item.
    pub price: Amount,
    /// This participant's equal share of it.
    pub share: Amount,
}

/// What one participant owes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PersonTotal {
    pub person: String,

    /// Items this person owns.
    pub items: Vec<Item>,

    /// Shared items this person is in, with their share.
    pub shared_items: Vec<SharedShare>,

    /// Sum of owned item prices.
    pub subtotal: Amount,

    /// Sum of shares.
    pub shared_subtotal: Amount,

    /// Proportional slice of the bill's service charge.
    pub service_charge: Amount,

    /// Everything this person pays.
    pub total: Amount,
}

impl PersonTotal {
    /// Owned items plus shares, before the service charge.
    #[inline]
    pub fn total_before_service(&self) -> Amount {
        self.subtotal + self.shared_subtotal
    }
}

/// The computed split of a whole bill.
///
/// Derived on demand and never stored; recompute after every edit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BillSplit {
    /// One entry per participant, keyed by `person`, in display order.
    pub person_totals: Vec<PersonTotal>,

    /// Items plus shared items, before service charge.
    pub subtotal: Amount,

    /// The resolved service charge for the whole bill.
    pub service_charge: Amount,

    /// `subtotal + service_charge`.
    pub grand_total: Amount,
}

impl BillSplit {
    /// Looks up a participant's row by name.
    pub fn person(&self, name: &str) -> Option<&PersonTotal> {
        self.person_totals.iter().find(|p| p.person == name)
    }

    /// Participant names in display order.
    pub fn people(&self) -> impl Iterator<Item = &str> {
        self.person_totals.iter().map(|p| p.person.as_str())
    }

    /// Sum of every participant's total.
    ///
    /// Equals [`BillSplit::grand_total`] except in the documented edge
    /// cases (orphan sharers, zero subtotal with a fixed charge).
    pub fn allocated_total(&self) -> Amount {
        self.person_totals.iter().map(|p| p.total).sum()
    }

    /// True when there is nobody to split between.
    pub fn is_empty(&self) -> bool {
        self.person_totals.is_empty()
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Computes the per-person split of a bill.
///
/// Pure and total: every input produces a result, and an empty bill
/// produces an empty split with zero totals.
///
/// ## Example
/// ```rust
/// use kkb_core::calculator::compute;
/// use kkb_core::types::{BillState, Item, ItemId, ServiceChargeConfig, ServiceChargeKind};
///
/// let bill = BillState {
///     items: vec![
///         Item::try_new(ItemId::new(1), "Steak", "100", "A").unwrap(),
///         Item::try_new(ItemId::new(2), "Lobster", "200", "B").unwrap(),
///     ],
///     service_charge: ServiceChargeConfig::new("10", ServiceChargeKind::Percent),
///     ..BillState::default()
/// };
///
/// let split = compute(&bill);
/// assert!((split.service_charge.value() - 30.0).abs() < 1e-9);
/// assert!((split.person("A").unwrap().total.value() - 110.0).abs() < 1e-9);
/// assert!((split.person("B").unwrap().total.value() - 220.0).abs() < 1e-9);
/// ```
pub fn compute(state: &BillState) -> BillSplit {
    let item_subtotal: Amount = state.items.iter().map(|i| i.price).sum();
    let shared_subtotal: Amount = state.shared_items.iter().map(|s| s.price).sum();
    let subtotal = item_subtotal + shared_subtotal;

    let service_charge = state.service_charge.amount_for(subtotal);

    for shared in state.shared_items.iter().filter(|s| s.shared_by.is_empty()) {
        warn!(
            id = %shared.id,
            name = %shared.name,
            "Shared item has nobody to split between; its price is not allocated"
        );
    }

    let person_totals = state
        .participants()
        .into_iter()
        .map(|person| person_total(state, person, subtotal, service_charge))
        .collect();

    BillSplit {
        person_totals,
        subtotal,
        service_charge,
        grand_total: subtotal + service_charge,
    }
}

fn person_total(
    state: &BillState,
    person: String,
    bill_subtotal: Amount,
    bill_service_charge: Amount,
) -> PersonTotal {
    let items: Vec<Item> = state
        .items
        .iter()
        .filter(|i| i.person == person)
        .cloned()
        .collect();
    let subtotal: Amount = items.iter().map(|i| i.price).sum();

    let shared_items: Vec<SharedShare> = state
        .shared_items
        .iter()
        .filter(|s| s.is_shared_by(&person))
        .filter_map(|s| {
            s.share().map(|share| SharedShare {
                name: s.name.clone(),
                price: s.price,
                share,
            })
        })
        .collect();
    let shared_subtotal: Amount = shared_items.iter().map(|s| s.share).sum();

    let before_service = subtotal + shared_subtotal;
    let service_charge = if bill_subtotal.is_positive() {
        bill_service_charge * (before_service.value() / bill_subtotal.value())
    } else {
        Amount::zero()
    };

    PersonTotal {
        person,
        items,
        shared_items,
        subtotal,
        shared_subtotal,
        service_charge,
        total: before_service + service_charge,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
