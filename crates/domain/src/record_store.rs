use compact_str::CompactString;
use rustc_hash::FxHashMap;
use std::net::IpAddr;

use crate::errors::DomainError;

/// Read-only view over the configured local zone.
///
/// Keys are stored lower-cased exactly as configured, with or without the
/// trailing root dot; [`LocalRecordStore::lookup`] tries both spellings.
#[derive(Debug, Default, Clone)]
pub struct LocalRecordStore {
    records: FxHashMap<CompactString, IpAddr>,
}

impl LocalRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the store from `name -> ip literal` pairs.
    ///
    /// Configuration validation already rejects bad literals, so a failure
    /// here means the caller skipped [`crate::Config::validate`].
    pub fn from_records<'a, I>(records: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut store = Self::new();
        for (name, ip) in records {
            let addr: IpAddr = ip.parse().map_err(|_| {
                DomainError::InvalidIpAddress(format!("{} for {}", ip, name))
            })?;
            store.insert(name, addr);
        }
        Ok(store)
    }

    pub fn insert(&mut self, name: &str, addr: IpAddr) {
        self.records
            .insert(CompactString::from(name.to_ascii_lowercase()), addr);
    }

    /// `name` must already be lower-case and fully qualified.
    pub fn lookup(&self, name: &str) -> Option<IpAddr> {
        let bare = name.strip_suffix('.').unwrap_or(name);
        self.records
            .get(bare)
            .or_else(|| self.records.get(name))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
