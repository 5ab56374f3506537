//! # Domain Types
//!
//! The bill model shared by every front end.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           BillState                                     │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │      Item       │   │   SharedItem    │   │ ServiceChargeConfig  │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  id             │   │  id             │   │  value (raw text)    │  │
//! │  │  name           │   │  name           │   │  kind                │  │
//! │  │  price          │   │  price          │   │   ├ Fixed            │  │
//! │  │  person         │   │  shared_by[]    │   │   └ Percent          │  │
//! │  └─────────────────┘   └─────────────────┘   └──────────────────────┘  │
//! │                                                                         │
//! │  + currency_symbol                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items and shared items are created whole and removed whole; nothing is
//! edited in place.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use ts_rs::TS;

use crate::amount::Amount;
use crate::error::ValidationError;
use crate::validation::{self, ValidationResult};
use crate::DEFAULT_CURRENCY;

// =============================================================================
// Item Identifier
// =============================================================================

/// Identifier of an item or shared item.
///
/// Unique within a bill. The value happens to be a millisecond timestamp
/// (see [`crate::session::IdGenerator`]) but only uniqueness is relied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemId(i64);

impl ItemId {
    #[inline]
    pub const fn new(raw: i64) -> Self {
        ItemId(raw)
    }

    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Item
// =============================================================================

/// A charge owned by exactly one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    pub id: ItemId,

    /// Display name, trimmed and non-empty.
    pub name: String,

    pub price: Amount,

    /// Owner. Every distinct owner is a participant of the bill.
    pub person: String,
}

impl Item {
    /// Builds an item from raw form input.
    ///
    /// Names are trimmed; an empty name, empty owner or non-numeric price
    /// is rejected.
    ///
    /// ## Example
    /// ```rust
    /// use kkb_core::types::{Item, ItemId};
    ///
    /// let item = Item::try_new(ItemId::new(1), " Halo-halo ", "85", "Ana").unwrap();
    /// assert_eq!(item.name, "Halo-halo");
    /// assert!(Item::try_new(ItemId::new(2), "Halo-halo", "", "Ana").is_err());
    /// ```
    pub fn try_new(id: ItemId, name: &str, price: &str, person: &str) -> ValidationResult<Self> {
        Ok(Item {
            id,
            name: validation::validate_name("name", name)?,
            price: validation::validate_price(price)?,
            person: validation::validate_name("person", person)?,
        })
    }
}

// =============================================================================
// Shared Item
// =============================================================================

/// A charge divided equally among a subset of participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SharedItem {
    pub id: ItemId,
    pub name: String,
    pub price: Amount,

    /// Sharers in selection order. Non-empty, no duplicates.
    pub shared_by: Vec<String>,
}

impl SharedItem {
    /// Builds a shared item from raw form input and a sharer selection.
    pub fn try_new<S: AsRef<str>>(
        id: ItemId,
        name: &str,
        price: &str,
        shared_by: &[S],
    ) -> ValidationResult<Self> {
        Ok(SharedItem {
            id,
            name: validation::validate_name("name", name)?,
            price: validation::validate_price(price)?,
            shared_by: validation::validate_shared_by(shared_by)?,
        })
    }

    /// Equal share of the price for one sharer.
    ///
    /// `None` for an empty `shared_by`, which valid bills never contain.
    pub fn share(&self) -> Option<Amount> {
        if self.shared_by.is_empty() {
            None
        } else {
            Some(self.price / self.shared_by.len() as f64)
        }
    }

    pub fn is_shared_by(&self, person: &str) -> bool {
        self.shared_by.iter().any(|p| p == person)
    }
}

// =============================================================================
// Service Charge
// =============================================================================

/// How the service charge value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ServiceChargeKind {
    /// A flat amount added to the bill.
    #[default]
    Fixed,
    /// A percentage of the bill subtotal.
    Percent,
}

impl fmt::Display for ServiceChargeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceChargeKind::Fixed => write!(f, "fixed"),
            ServiceChargeKind::Percent => write!(f, "percent"),
        }
    }
}

impl std::str::FromStr for ServiceChargeKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" | "amount" => Ok(ServiceChargeKind::Fixed),
            "percent" | "percentage" | "%" => Ok(ServiceChargeKind::Percent),
            other => Err(ValidationError::InvalidFormat {
                field: "service charge kind".to_string(),
                reason: format!("unknown kind '{}', expected fixed or percent", other),
            }),
        }
    }
}

/// The service charge as typed by the user.
///
/// `value` is kept as raw text so the bill round-trips exactly what was
/// entered; it is only interpreted when the split is computed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceChargeConfig {
    #[serde(default)]
    pub value: String,

    #[serde(default)]
    pub kind: ServiceChargeKind,
}

impl ServiceChargeConfig {
    pub fn new(value: impl Into<String>, kind: ServiceChargeKind) -> Self {
        ServiceChargeConfig {
            value: value.into(),
            kind,
        }
    }

    /// The entered value as a number; empty or unparsable is 0.
    pub fn numeric_value(&self) -> f64 {
        Amount::parse_or_zero(&self.value).value()
    }

    /// Resolves the charge for a bill with the given subtotal.
    ///
    /// ## Example
    /// ```rust
    /// use kkb_core::amount::Amount;
    /// use kkb_core::types::{ServiceChargeConfig, ServiceChargeKind};
    ///
    /// let pct = ServiceChargeConfig::new("10", ServiceChargeKind::Percent);
    /// assert_eq!(pct.amount_for(Amount::new(300.0)).value(), 30.0);
    ///
    /// let fixed = ServiceChargeConfig::new("25", ServiceChargeKind::Fixed);
    /// assert_eq!(fixed.amount_for(Amount::new(300.0)).value(), 25.0);
    /// ```
    pub fn amount_for(&self, subtotal: Amount) -> Amount {
        let value = self.numeric_value();
        match self.kind {
            ServiceChargeKind::Percent => subtotal * (value / 100.0),
            ServiceChargeKind::Fixed => Amount::new(value),
        }
    }
}

// =============================================================================
// Bill State
// =============================================================================

/// Everything needed to reproduce a bill: the unit of sharing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BillState {
    #[serde(default)]
    pub items: Vec<Item>,

    #[serde(default)]
    pub shared_items: Vec<SharedItem>,

    #[serde(default)]
    pub service_charge: ServiceChargeConfig,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for BillState {
    fn default() -> Self {
        BillState {
            items: Vec::new(),
            shared_items: Vec::new(),
            service_charge: ServiceChargeConfig::default(),
            currency_symbol: default_currency(),
        }
    }
}

impl BillState {
    /// Distinct item owners, in order of first appearance.
    ///
    /// Derived on every call, never stored.
    pub fn participants(&self) -> Vec<String> {
        let mut people: Vec<String> = Vec::new();
        for item in &self.items {
            if !people.iter().any(|p| p == &item.person) {
                people.push(item.person.clone());
            }
        }
        people
    }

    /// Largest identifier used by any item or shared item.
    pub fn max_id(&self) -> Option<ItemId> {
        self.items
            .iter()
            .map(|i| i.id)
            .chain(self.shared_items.iter().map(|s| s.id))
            .max()
    }

    /// Smallest non-negative identifier not used by any item or shared item.
    pub fn smallest_unused_id(&self) -> ItemId {
        let used: HashSet<i64> = self
            .items
            .iter()
            .map(|i| i.id.get())
            .chain(self.shared_items.iter().map(|s| s.id.get()))
            .collect();

        let mut candidate = 0;
        while used.contains(&candidate) {
            candidate += 1;
        }
        ItemId::new(candidate)
    }

    /// True when the bill has no items of either kind.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.shared_items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
