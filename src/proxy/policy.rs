//! Which method calls are eligible for caching.

use std::collections::BTreeSet;

use crate::config::ConfigError;
use crate::proxy::entity::Accessor;

/// Methods never cached by default.
pub const DEFAULT_NON_CACHE_METHODS: &[&str] = &["tostring"];

/// Cache/no-cache decision for method calls.
///
/// Only one of the two method sets is consulted, chosen by
/// `cache_by_default`. Both sets hold lower-cased, de-duplicated names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    cache_by_default: bool,
    cache_methods: BTreeSet<String>,
    non_cache_methods: BTreeSet<String>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            cache_by_default: true,
            cache_methods: BTreeSet::new(),
            non_cache_methods: DEFAULT_NON_CACHE_METHODS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl CachePolicy {
    pub fn should_cache(&self, method: &str) -> bool {
        let method = method.to_lowercase();
        if self.cache_by_default {
            !self.non_cache_methods.contains(&method)
        } else {
            self.cache_methods.contains(&method)
        }
    }

    pub fn cache_by_default(&self) -> bool {
        self.cache_by_default
    }

    pub fn set_cache_by_default(&mut self, cache_by_default: bool) {
        self.cache_by_default = cache_by_default;
    }

    pub fn cache_methods(&self) -> &BTreeSet<String> {
        &self.cache_methods
    }

    /// Replace the allowlist used when `cache_by_default` is false.
    ///
    /// Leaves the policy untouched on error.
    pub fn set_cache_methods<I, S>(&mut self, methods: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cache_methods = normalize(methods, "cache_methods")?;
        Ok(())
    }

    pub fn non_cache_methods(&self) -> &BTreeSet<String> {
        &self.non_cache_methods
    }

    /// Replace the denylist used when `cache_by_default` is true.
    ///
    /// Leaves the policy untouched on error.
    pub fn set_non_cache_methods<I, S>(&mut self, methods: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.non_cache_methods = normalize(methods, "non_cache_methods")?;
        Ok(())
    }
}

fn normalize<I, S>(methods: I, option: &'static str) -> Result<BTreeSet<String>, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    methods
        .into_iter()
        .map(|method| {
            let method = method.as_ref().to_lowercase();
            if Accessor::is_reserved(&method) {
                Err(ConfigError::ReservedMethod {
                    name: method,
                    option,
                })
            } else {
                Ok(method)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_policy_skips_tostring() {
        let policy = CachePolicy::default();
        assert!(policy.cache_by_default());
        assert!(!policy.should_cache("toString"));
        assert!(policy.should_cache("greet"));
    }

    #[test]
    fn test_allowlist_mode() {
        let mut policy = CachePolicy::default();
        policy.set_cache_by_default(false);
        policy.set_cache_methods(["Foo"]).unwrap();

        assert!(policy.should_cache("foo"));
        assert!(policy.should_cache("FOO"));
        assert!(!policy.should_cache("bar"));
        // The denylist is ignored in allowlist mode
        assert!(!policy.should_cache("tostring"));
    }

    #[test]
    fn test_reserved_accessor_rejected() {
        let mut policy = CachePolicy::default();
        for accessor in Accessor::ALL {
            let result = policy.set_cache_methods([accessor.method_name()]);
            assert!(matches!(
                result,
                Err(ConfigError::ReservedMethod { option: "cache_methods", .. })
            ));
        }
        let result = policy.set_non_cache_methods(["foo", "Read_Property"]);
        assert!(matches!(
            result,
            Err(ConfigError::ReservedMethod { ref name, option: "non_cache_methods" }) if name == "read_property"
        ));
        // Failed setters leave the previous sets in place
        assert!(policy.cache_methods().is_empty());
        assert_eq!(
            policy.non_cache_methods().iter().collect::<Vec<_>>(),
            vec!["tostring"]
        );
    }

    #[test]
    fn test_sets_are_deduplicated() {
        let mut policy = CachePolicy::default();
        policy
            .set_non_cache_methods(["Save", "save", "SAVE", "load"])
            .unwrap();
        assert_eq!(
            policy.non_cache_methods().iter().collect::<Vec<_>>(),
            vec!["load", "save"]
        );
    }

    proptest! {
        /// Denylist mode: cached iff not listed
        #[test]
        fn property_denylist_mode(
            listed in proptest::collection::vec("[a-zA-Z]{1,8}", 0..6),
            method in "[a-zA-Z]{1,8}"
        ) {
            let mut policy = CachePolicy::default();
            policy.set_non_cache_methods(&listed).unwrap();
            let is_listed = listed.iter().any(|m| m.eq_ignore_ascii_case(&method));
            prop_assert_eq!(policy.should_cache(&method), !is_listed);
        }

        /// Allowlist mode: cached iff listed
        #[test]
        fn property_allowlist_mode(
            listed in proptest::collection::vec("[a-zA-Z]{1,8}", 0..6),
            method in "[a-zA-Z]{1,8}"
        ) {
            let mut policy = CachePolicy::default();
            policy.set_cache_by_default(false);
            policy.set_cache_methods(&listed).unwrap();
            let is_listed = listed.iter().any(|m| m.eq_ignore_ascii_case(&method));
            prop_assert_eq!(policy.should_cache(&method), is_listed);
        }
    }
}
