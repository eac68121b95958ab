//! Cache key resolution.

use serde_json::Value;

use crate::proxy::options::{CallOptions, EntityCacheOptions};

/// Where a key comes from, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource<'a> {
    /// Used verbatim.
    Explicit(&'a str),
    /// Stable prefix combined with the method name and arguments.
    Prefixed(&'a str),
    /// Derived from the entity identity.
    Identity,
}

impl<'a> KeySource<'a> {
    /// Layer per-call options over instance options.
    ///
    /// An explicit per-call key wins, then a per-call entity key, then the
    /// configured entity key; otherwise the identity form is used.
    pub fn resolve(call: &'a CallOptions, options: &'a EntityCacheOptions) -> Self {
        if let Some(key) = call.key.as_deref() {
            KeySource::Explicit(key)
        } else if let Some(prefix) = call.entity_key.as_deref() {
            KeySource::Prefixed(prefix)
        } else if let Some(prefix) = options.entity_key() {
            KeySource::Prefixed(prefix)
        } else {
            KeySource::Identity
        }
    }
}

/// Builds cache keys. Pure and deterministic.
pub struct KeyResolver;

impl KeyResolver {
    pub fn resolve(identity: &str, method: &str, args: &[Value], source: KeySource<'_>) -> String {
        match source {
            KeySource::Explicit(key) => key.to_string(),
            KeySource::Prefixed(prefix) => Self::prefixed(prefix, method, args),
            KeySource::Identity => Self::identity_key(identity, method, args),
        }
    }

    /// `"{prefix}::{method}"`, plus `"-{digest}"` of the arguments when there are any.
    pub fn prefixed(prefix: &str, method: &str, args: &[Value]) -> String {
        let mut key = format!("{}::{}", prefix, method.to_lowercase());
        if !args.is_empty() {
            key.push('-');
            key.push_str(blake3::hash(&canonical_args(args)).to_hex().as_str());
        }
        key
    }

    /// BLAKE3 digest over identity, method name and arguments.
    pub fn identity_key(identity: &str, method: &str, args: &[Value]) -> String {
        let method = method.to_lowercase();
        let args = canonical_args(args);

        let mut hasher = blake3::Hasher::new();
        // Length-delimited so field boundaries cannot shift
        for field in [identity.as_bytes(), method.as_bytes(), args.as_slice()] {
            hasher.update(&(field.len() as u64).to_le_bytes());
            hasher.update(field);
        }
        hasher.finalize().to_hex().to_string()
    }
}

// serde_json objects are BTreeMap-backed, so key order is canonical
fn canonical_args(args: &[Value]) -> Vec<u8> {
    serde_json::to_vec(args).unwrap_or_default()
}
