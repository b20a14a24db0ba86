//! Claim construction.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use common::protocol::TokenClaims;

use super::options::TokenOptions;

/// Prefix of every token id; the rest is the issuance time in epoch millis.
pub const TOKEN_ID_PREFIX: &str = "token-";

/// Build the claim set for `options` as of `now`.
///
/// `now` is truncated to whole milliseconds first, so the id, `created_at` and
/// `expire_time` all derive from the same instant and survive the
/// millisecond-precision wire format unchanged. Ids are not unique across
/// calls landing in the same millisecond.
pub fn build_claims_at(options: &TokenOptions, now: DateTime<Utc>) -> TokenClaims {
    let created_at = now.trunc_subsecs(3);
    let lifetime = TimeDelta::seconds(i64::from(options.expire_seconds().get()));

    TokenClaims {
        id: format!("{TOKEN_ID_PREFIX}{}", created_at.timestamp_millis()),
        api_key: options.api_key().to_owned(),
        max_calls: options.max_calls(),
        expire_time: created_at + lifetime,
        created_at,
        provider: options.provider().to_owned(),
        ext_info: options.ext_info().to_owned(),
    }
}
