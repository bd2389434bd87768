use compact_str::{format_compact, CompactString};
use std::fmt;

/// Fingerprint of a question: fully-qualified lower-case name plus the
/// textual record type, e.g. `example.org.:MX`.
///
/// Transaction ids and flags never take part in the key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(CompactString);

impl CacheKey {
    pub fn new(name: &str, record_type: &str) -> Self {
        let name = crate::normalize_fqdn(name);
        Self(format_compact!(
            "{}:{}",
            name,
            record_type.to_ascii_uppercase()
        ))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
