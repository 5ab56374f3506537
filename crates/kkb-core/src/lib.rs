//! # kkb-core: Pure Bill Splitting Logic
//!
//! This crate is the **heart** of the KKB ("Kanya-Kanyang Bayad") bill
//! splitter. It contains all bill logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KKB Architecture                                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Front ends (web form, `kkb` CLI)                   │   │
//! │  │    Add items ──► Shared items ──► Service charge ──► Results    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ BillState / token                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kkb-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ calculator │  │   codec   │  │  session  │  │   │
//! │  │   │ BillState │  │  compute   │  │  encode   │  │  editing  │  │   │
//! │  │   │   Item    │  │ BillSplit  │  │  decode   │  │  share    │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO NETWORK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Bill model (Item, SharedItem, ServiceChargeConfig, BillState)
//! - [`amount`] - Amount type with lenient parsing and display
//! - [`calculator`] - Per-person split with proportional service charge
//! - [`codec`] - Reversible, URL-safe share tokens
//! - [`session`] - Single-writer editing of a bill
//! - [`share`] - `?data=<token>` share links
//! - [`validation`] - Guarded input rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kkb_core::session::BillSession;
//! use kkb_core::types::ServiceChargeKind;
//!
//! let mut session = BillSession::new();
//! session.add_item("Adobo", "100", "Ana");
//! session.add_item("Sinigang", "200", "Ben");
//! session.set_service_charge("10", ServiceChargeKind::Percent);
//!
//! let split = session.compute();
//! assert!((split.grand_total.value() - 330.0).abs() < 1e-9);
//! assert!((split.person("Ana").unwrap().total.value() - 110.0).abs() < 1e-9);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod amount;
pub mod calculator;
pub mod codec;
pub mod error;
pub mod session;
pub mod share;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use amount::Amount;
pub use calculator::{compute, BillSplit, PersonTotal, SharedShare};
pub use codec::{decode, encode};
pub use error::{CoreError, DecodeError, ValidationError};
pub use session::BillSession;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency symbols offered by the bill form, in display order.
///
/// Advisory only: the model accepts any symbol string.
pub const SUPPORTED_CURRENCIES: &[&str] = &[
    "$", "€", "£", "¥", "₱", "₹", "Rs", "RM", "S$", "A$", "C$", "CHF", "kr", "R",
];

/// Currency symbol of a fresh bill.
pub const DEFAULT_CURRENCY: &str = "$";

/// Tolerance used when comparing sums of amounts.
pub const AMOUNT_EPSILON: f64 = 1e-6;

/// Longest accepted item, shared item or participant name (in characters).
pub const MAX_NAME_LENGTH: usize = 200;
