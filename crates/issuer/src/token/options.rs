//! Caller-supplied token parameters.

use std::num::{NonZeroU16, NonZeroU32};

/// Default number of relay calls a token allows.
pub const DEFAULT_MAX_CALLS: u32 = 100;

/// Default upstream provider the relay forwards to.
pub const DEFAULT_PROVIDER: &str = "dashscope";

/// One day, the default token lifetime.
pub const SECONDS_PER_DAY: NonZeroU32 = match NonZeroU32::new(86_400) {
    Some(secs) => secs,
    None => unreachable!(),
};

/// Parameters for a single token.
///
/// Built with [`TokenOptions::new`] and the `with_*` methods; every field has
/// a default except the API key.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenOptions {
    api_key: String,
    max_calls: u32,
    expire_seconds: NonZeroU32,
    provider: String,
    ext_info: String,
}

impl TokenOptions {
    /// Options for `api_key` with all other fields at their defaults.
    ///
    /// An empty key is accepted; the resulting token is simply unusable.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            max_calls: DEFAULT_MAX_CALLS,
            expire_seconds: SECONDS_PER_DAY,
            provider: DEFAULT_PROVIDER.into(),
            ext_info: String::new(),
        }
    }

    pub fn with_max_calls(mut self, max_calls: u32) -> Self {
        self.max_calls = max_calls;
        self
    }

    pub fn with_expire_seconds(mut self, expire_seconds: NonZeroU32) -> Self {
        self.expire_seconds = expire_seconds;
        self
    }

    /// Lifetime in whole days; saturates at `u32::MAX` seconds (about 136 years).
    pub fn with_expire_days(mut self, days: NonZeroU16) -> Self {
        self.expire_seconds = NonZeroU32::from(days).saturating_mul(SECONDS_PER_DAY);
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Free-form extension data passed through to the relay, typically JSON
    /// such as `{"rep_m":"qwen-max"}`.
    pub fn with_ext_info(mut self, ext_info: impl Into<String>) -> Self {
        self.ext_info = ext_info.into();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn max_calls(&self) -> u32 {
        self.max_calls
    }

    pub fn expire_seconds(&self) -> NonZeroU32 {
        self.expire_seconds
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn ext_info(&self) -> &str {
        &self.ext_info
    }
}

impl std::fmt::Debug for TokenOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenOptions")
            .field("api_key", &"[REDACTED]")
            .field("max_calls", &self.max_calls)
            .field("expire_seconds", &self.expire_seconds)
            .field("provider", &self.provider)
            .field("ext_info", &self.ext_info)
            .finish()
    }
}
