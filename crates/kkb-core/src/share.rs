//! # Share Links
//!
//! A bill travels as `?data=<token>` on the app URL. Opening such a link
//! restores the bill; any other query parameters are left alone.
//!
//! ```text
//!   https://kkb.app/?ref=chat&data=eyJ2IjoxLCJpdGVtcyI6W3siaWQiOjE3...
//!                    └──┬───┘ └───────────────┬──────────────────────┘
//!                    kept as is       codec::encode(&BillState)
//! ```

use url::Url;

use crate::codec;
use crate::error::DecodeResult;
use crate::types::BillState;

/// Query parameter carrying the bill token.
pub const SHARE_QUERY_PARAM: &str = "data";

/// Builds the share link for `state` under `base`.
///
/// An existing `data` parameter on `base` is replaced.
///
/// ## Example
/// ```rust
/// use kkb_core::share::{share_link, state_from_url};
/// use kkb_core::types::BillState;
/// use url::Url;
///
/// let base = Url::parse("https://kkb.app/?lang=tl").unwrap();
/// let link = share_link(&base, &BillState::default());
///
/// assert!(link.as_str().starts_with("https://kkb.app/?lang=tl&data="));
/// assert_eq!(state_from_url(&link).unwrap().unwrap(), BillState::default());
/// ```
pub fn share_link(base: &Url, state: &BillState) -> Url {
    let token = codec::encode(state);

    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != SHARE_QUERY_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut link = base.clone();
    link.set_query(None);
    link.query_pairs_mut()
        .extend_pairs(kept.iter())
        .append_pair(SHARE_QUERY_PARAM, &token);
    link
}

/// The token carried by `url`, if any.
pub fn token_from_url(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == SHARE_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}

/// Decodes the bill carried by `url`.
///
/// `None` when the link carries no token at all.
pub fn state_from_url(url: &Url) -> Option<DecodeResult<BillState>> {
    token_from_url(url).map(|token| codec::decode(&token))
}
