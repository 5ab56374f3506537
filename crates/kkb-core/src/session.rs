//! # Bill Session
//!
//! The single owner of a bill while it is being edited.
//!
//! ## Edit Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Bill Session Operations                              │
//! │                                                                         │
//! │  Form Action              Session Method           State Change         │
//! │  ───────────              ──────────────           ────────────         │
//! │                                                                         │
//! │  Add item ───────────────► add_item() ───────────► items.push(item)    │
//! │  Trash item ─────────────► remove_item() ────────► items.retain(..)    │
//! │                                                                         │
//! │  Tap a name ─────────────► toggle_person() ──────► selection ±= name   │
//! │  Select all ─────────────► toggle_select_all() ──► selection = all/∅   │
//! │  Add shared item ────────► add_shared_item() ────► shared.push(..),    │
//! │                                                     selection = ∅       │
//! │                                                                         │
//! │  Service charge ─────────► set_service_charge() ─► service_charge = .. │
//! │  Currency ───────────────► set_currency() ───────► currency_symbol = ..│
//! │                                                                         │
//! │  Any read ───────────────► compute() ────────────► (fresh BillSplit)   │
//! │                                                                         │
//! │  NOTE: Invalid input makes an edit a no-op. Nothing is half-applied.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A session is plain owned data: one writer, no locking.

use chrono::Utc;
use tracing::{debug, warn};
use url::Url;

use crate::calculator::{self, BillSplit};
use crate::codec;
use crate::error::CoreResult;
use crate::share;
use crate::types::{BillState, Item, ItemId, ServiceChargeKind, SharedItem};

// =============================================================================
// Identifier Generation
// =============================================================================

/// Issues strictly increasing item identifiers.
///
/// Identifiers start from the wall clock in milliseconds; when the clock
/// has not moved on (or went backwards) the previous id plus one is used.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: Option<i64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator whose ids are all greater than `id`.
    pub fn after(id: ItemId) -> Self {
        IdGenerator {
            last: Some(id.get()),
        }
    }

    /// Returns the next identifier, or `None` once `i64::MAX` has been
    /// issued.
    pub fn next_id(&mut self) -> Option<ItemId> {
        let now = Utc::now().timestamp_millis();
        let next = match self.last {
            Some(last) if now <= last => last.checked_add(1)?,
            _ => now,
        };
        self.last = Some(next);
        Some(ItemId::new(next))
    }
}

// =============================================================================
// Bill Session
// =============================================================================

/// A bill being edited, plus the pending "split between" selection.
///
/// ## Invariants
/// - Every item and shared item id is unique within the session
/// - Shared items always have at least one sharer, without duplicates
/// - The selection holds each name at most once, in tap order
#[derive(Debug, Clone, Default)]
pub struct BillSession {
    state: BillState,
    ids: IdGenerator,
    selection: Vec<String>,
}

impl BillSession {
    /// Creates a session with an empty bill.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing bill; new ids continue past the largest one in it.
    pub fn from_state(state: BillState) -> Self {
        let ids = state.max_id().map(IdGenerator::after).unwrap_or_default();
        BillSession {
            state,
            ids,
            selection: Vec::new(),
        }
    }

    /// Restores a session from a share token.
    pub fn try_from_token(token: &str) -> CoreResult<Self> {
        Ok(Self::from_state(codec::decode(token)?))
    }

    /// Restores a session from a share token, or starts empty if the token
    /// cannot be read.
    pub fn from_token(token: &str) -> Self {
        Self::from_state(codec::decode_or_default(token))
    }

    /// Restores a session from the `data` parameter of a share link.
    ///
    /// No parameter, or an unreadable one, gives an empty session.
    pub fn from_url(url: &Url) -> Self {
        match share::state_from_url(url) {
            Some(Ok(state)) => Self::from_state(state),
            Some(Err(e)) => {
                warn!(error = %e, "Share link carries an unreadable bill, starting empty");
                Self::new()
            }
            None => Self::new(),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn state(&self) -> &BillState {
        &self.state
    }

    pub fn into_state(self) -> BillState {
        self.state
    }

    /// Distinct item owners in first-appearance order.
    pub fn participants(&self) -> Vec<String> {
        self.state.participants()
    }

    /// Computes the split of the current bill. Never cached.
    pub fn compute(&self) -> BillSplit {
        calculator::compute(&self.state)
    }

    /// Token for the current bill.
    pub fn share_token(&self) -> String {
        codec::encode(&self.state)
    }

    /// Share link for the current bill under `base`.
    pub fn share_link(&self, base: &Url) -> Url {
        share::share_link(base, &self.state)
    }

    /// Next id for a new entity. Falls back to the smallest free id when a
    /// restored bill already holds `i64::MAX`.
    fn allocate_id(&mut self) -> ItemId {
        match self.ids.next_id() {
            Some(id) => id,
            None => {
                let id = self.state.smallest_unused_id();
                warn!(id = %id, "Item ids exhausted, reusing a free id");
                id
            }
        }
    }

    // =========================================================================
    // Individual Items
    // =========================================================================

    /// Adds an item owned by `person`.
    ///
    /// ## Errors
    /// A blank name or owner, or a price that is not a number.
    pub fn try_add_item(&mut self, name: &str, price: &str, person: &str) -> CoreResult<ItemId> {
        let item = Item::try_new(self.allocate_id(), name, price, person)?;
        let id = item.id;
        debug!(id = %id, person = %item.person, price = %item.price, "Item added");
        self.state.items.push(item);
        Ok(id)
    }

    /// Adds an item; invalid input leaves the bill untouched.
    pub fn add_item(&mut self, name: &str, price: &str, person: &str) -> Option<ItemId> {
        match self.try_add_item(name, price, person) {
            Ok(id) => Some(id),
            Err(e) => {
                debug!(error = %e, "Item not added");
                None
            }
        }
    }

    /// Removes an item. Returns false if no item has that id.
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let before = self.state.items.len();
        self.state.items.retain(|i| i.id != id);
        let removed = self.state.items.len() != before;
        debug!(id = %id, removed, "remove_item");
        removed
    }

    // =========================================================================
    // Shared Items
    // =========================================================================

    /// People currently selected for the next shared item.
    pub fn selected_people(&self) -> &[String] {
        &self.selection
    }

    /// Selects `person` if unselected, deselects them otherwise.
    pub fn toggle_person(&mut self, person: &str) {
        if let Some(pos) = self.selection.iter().position(|p| p == person) {
            self.selection.remove(pos);
        } else {
            self.selection.push(person.to_string());
        }
    }

    /// Selects every participant, or clears the selection if every
    /// participant is already selected.
    pub fn toggle_select_all(&mut self) {
        let participants = self.participants();
        let all_selected = !participants.is_empty()
            && participants.iter().all(|p| self.selection.contains(p));

        self.selection = if all_selected {
            Vec::new()
        } else {
            participants
        };
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Adds a shared item split between the current selection, then
    /// clears the selection.
    ///
    /// ## Errors
    /// A blank name, a price that is not a number, or nobody selected.
    pub fn try_add_shared_item(&mut self, name: &str, price: &str) -> CoreResult<ItemId> {
        let shared = SharedItem::try_new(self.allocate_id(), name, price, self.selection.as_slice())?;
        let id = shared.id;
        debug!(
            id = %id,
            sharers = shared.shared_by.len(),
            price = %shared.price,
            "Shared item added"
        );
        self.state.shared_items.push(shared);
        self.selection.clear();
        Ok(id)
    }

    /// Adds a shared item; invalid input leaves the bill and the selection
    /// untouched.
    pub fn add_shared_item(&mut self, name: &str, price: &str) -> Option<ItemId> {
        match self.try_add_shared_item(name, price) {
            Ok(id) => Some(id),
            Err(e) => {
                debug!(error = %e, "Shared item not added");
                None
            }
        }
    }

    /// Removes a shared item. Returns false if none has that id.
    pub fn remove_shared_item(&mut self, id: ItemId) -> bool {
        let before = self.state.shared_items.len();
        self.state.shared_items.retain(|s| s.id != id);
        let removed = self.state.shared_items.len() != before;
        debug!(id = %id, removed, "remove_shared_item");
        removed
    }

    // =========================================================================
    // Service Charge & Currency
    // =========================================================================

    /// Sets the service charge. The value is kept as typed; anything
    /// unparsable counts as zero when the split is computed.
    pub fn set_service_charge(&mut self, value: &str, kind: ServiceChargeKind) {
        self.state.service_charge.value = value.to_string();
        self.state.service_charge.kind = kind;
    }

    pub fn set_service_charge_value(&mut self, value: &str) {
        self.state.service_charge.value = value.to_string();
    }

    pub fn set_service_charge_kind(&mut self, kind: ServiceChargeKind) {
        self.state.service_charge.kind = kind;
    }

    pub fn set_currency(&mut self, symbol: &str) {
        self.state.currency_symbol = symbol.to_string();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
