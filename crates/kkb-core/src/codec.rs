//! # State Codec
//!
//! Reversible mapping between a [`BillState`] and a URL-safe text token.
//!
//! ## Token Format (version 1)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BillState                                                              │
//! │     │                                                                   │
//! │     ▼  serde_json (UTF-8, floats round-trip exactly)                    │
//! │  {"v":1,"items":[..],"sharedItems":[..],                                │
//! │   "serviceCharge":{"value":"10","kind":"percent"},"currency":"₱"}       │
//! │     │                                                                   │
//! │     ▼  base64, URL-safe alphabet, no padding                            │
//! │  eyJ2IjoxLCJpdGVtcyI6W10sInNoYXJlZEl0ZW1zIjpbXSwi...                    │
//! │                                                                         │
//! │  Alphabet: A-Z a-z 0-9 - _   (nothing to escape in a query string)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The base64 step works on the UTF-8 bytes of the JSON, so names such as
//! "Zoë" and symbols such as "₱" survive unchanged.
//!
//! ## Decoding Never Panics
//! Anything that is not a version-1 token yields a [`DecodeError`]; the
//! caller falls back to an empty bill (see [`decode_or_default`]).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use tracing::{debug, error, warn};

use crate::error::{DecodeError, DecodeResult};
use crate::types::{BillState, Item, ServiceChargeConfig, SharedItem};

/// Version written into every token.
pub const CODEC_VERSION: u32 = 1;

/// Longest token `decode` will look at.
pub const MAX_TOKEN_LENGTH: usize = 64 * 1024;

// =============================================================================
// Wire Payload
// =============================================================================

/// Borrowed view used when writing a token.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PayloadRef<'a> {
    v: u32,
    items: &'a [Item],
    shared_items: &'a [SharedItem],
    service_charge: &'a ServiceChargeConfig,
    currency: &'a str,
}

/// Owned payload read back from a token.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    items: Vec<Item>,
    shared_items: Vec<SharedItem>,
    service_charge: ServiceChargeConfig,
    currency: String,
}

/// Reads only the version so later versions can change every other field.
#[derive(Deserialize)]
struct VersionHeader {
    v: u32,
}

// =============================================================================
// Encode
// =============================================================================

/// Encodes a bill as a token suitable for a `?data=` query value.
///
/// ## Example
/// ```rust
/// use kkb_core::codec::{decode, encode};
/// use kkb_core::types::BillState;
///
/// let bill = BillState { currency_symbol: "₱".to_string(), ..BillState::default() };
/// let token = encode(&bill);
/// assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
/// assert_eq!(decode(&token).unwrap(), bill);
/// ```
pub fn encode(state: &BillState) -> String {
    let payload = PayloadRef {
        v: CODEC_VERSION,
        items: &state.items,
        shared_items: &state.shared_items,
        service_charge: &state.service_charge,
        currency: &state.currency_symbol,
    };

    let json = match serde_json::to_vec(&payload) {
        Ok(json) => json,
        Err(e) => {
            error!(error = %e, "Failed to serialize bill, sharing an empty token");
            return String::new();
        }
    };
    let token = URL_SAFE_NO_PAD.encode(json);

    debug!(
        items = state.items.len(),
        shared_items = state.shared_items.len(),
        token_len = token.len(),
        "Encoded bill token"
    );
    token
}

// =============================================================================
// Decode
// =============================================================================

/// Decodes a token produced by [`encode`].
///
/// ## Errors
/// ```text
/// ""/"==="           → Empty
/// > 64 KiB           → TooLong
/// "not base64!"      → Encoding
/// bytes ≠ UTF-8      → Utf8
/// JSON ≠ payload     → Malformed
/// {"v":2,...}        → UnsupportedVersion
/// sharedBy [] / dup  → Invalid
/// ```
pub fn decode(token: &str) -> DecodeResult<BillState> {
    let token = token.trim().trim_end_matches('=');

    if token.is_empty() {
        return Err(DecodeError::Empty);
    }

    if token.len() > MAX_TOKEN_LENGTH {
        return Err(DecodeError::TooLong {
            len: token.len(),
            max: MAX_TOKEN_LENGTH,
        });
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| DecodeError::Encoding(e.to_string()))?;
    let json = String::from_utf8(bytes).map_err(|_| DecodeError::Utf8)?;

    let header: VersionHeader =
        serde_json::from_str(&json).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    if header.v != CODEC_VERSION {
        return Err(DecodeError::UnsupportedVersion {
            found: header.v,
            expected: CODEC_VERSION,
        });
    }

    let payload: Payload =
        serde_json::from_str(&json).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    validate_payload(&payload)?;

    Ok(BillState {
        items: payload.items,
        shared_items: payload.shared_items,
        service_charge: payload.service_charge,
        currency_symbol: payload.currency,
    })
}

/// Decodes a token, falling back to an empty bill on any failure.
///
/// The failure is logged; it never reaches the user as an error.
pub fn decode_or_default(token: &str) -> BillState {
    decode(token).unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring unreadable bill token, starting with an empty bill");
        BillState::default()
    })
}

/// Rejects payloads the editing layer could never have produced.
fn validate_payload(payload: &Payload) -> DecodeResult<()> {
    let mut seen = HashSet::with_capacity(payload.items.len() + payload.shared_items.len());
    let ids = payload
        .items
        .iter()
        .map(|i| i.id)
        .chain(payload.shared_items.iter().map(|s| s.id));
    for id in ids {
        if !seen.insert(id) {
            return Err(DecodeError::Invalid(format!("id {} is used twice", id)));
        }
    }

    for shared in &payload.shared_items {
        if shared.shared_by.is_empty() {
            return Err(DecodeError::Invalid(format!(
                "shared item '{}' is split between nobody",
                shared.name
            )));
        }

        for (i, person) in shared.shared_by.iter().enumerate() {
            if shared.shared_by[..i].contains(person) {
                return Err(DecodeError::Invalid(format!(
                    "shared item '{}' lists '{}' twice",
                    shared.name, person
                )));
            }
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
