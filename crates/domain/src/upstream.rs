use compact_str::CompactString;
use rustc_hash::FxHashSet;
use std::fmt;
use std::net::IpAddr;

use crate::errors::DomainError;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// Host that an unparsable or host-less listen address is assumed to bind.
const WILDCARD_HOST: &str = "0.0.0.0";

/// Hosts that always answer on this machine: IPv4 and IPv6 loopback and the
/// local stub resolver.
const LOOPBACK_HOSTS: [&str; 3] = ["127.0.0.1", "::1", "127.0.0.53"];

/// Splits `host:port`, `[v6]:port` and `:port`.
///
/// Returns `None` when the port is missing or an unbracketed host contains
/// more than one colon.
pub fn split_host_port(input: &str) -> Option<(&str, &str)> {
    if let Some(rest) = input.strip_prefix('[') {
        let end = rest.find(']')?;
        let host = &rest[..end];
        let port = rest[end + 1..].strip_prefix(':')?;
        return Some((host, port));
    }

    let colon = input.rfind(':')?;
    let host = &input[..colon];
    if host.contains(':') {
        return None;
    }
    Some((host, &input[colon + 1..]))
}

/// IP literals compare in their canonical textual form, names case-insensitively.
fn canonical_host(host: &str) -> CompactString {
    match host.parse::<IpAddr>() {
        Ok(ip) => CompactString::from(ip.to_string()),
        Err(_) => CompactString::from(host.to_ascii_lowercase()),
    }
}

/// An upstream resolver in explicit `host:port` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpstreamAddr {
    host: CompactString,
    port: u16,
}

impl UpstreamAddr {
    /// Parses an upstream entry, defaulting the port to 53 when absent.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let input = input.trim();
        let (host, port) = match split_host_port(input) {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    DomainError::InvalidUpstreamAddress(format!("bad port in '{}'", input))
                })?;
                (host, port)
            }
            None => (
                input.trim_start_matches('[').trim_end_matches(']'),
                DEFAULT_DNS_PORT,
            ),
        };

        if host.is_empty() {
            return Err(DomainError::InvalidUpstreamAddress(format!(
                "missing host in '{}'",
                input
            )));
        }

        Ok(Self {
            host: canonical_host(host),
            port,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn ip(&self) -> Option<IpAddr> {
        self.host.parse().ok()
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Set of hosts the server must never forward to: its own listen host plus
/// the loopback literals.
#[derive(Debug, Clone)]
pub struct LoopGuard {
    rejected: FxHashSet<CompactString>,
}

impl LoopGuard {
    pub fn for_listen_address(listen: &str) -> Self {
        let listen_host = match split_host_port(listen) {
            Some((host, _)) if !host.is_empty() => host,
            _ => WILDCARD_HOST,
        };

        let mut rejected: FxHashSet<CompactString> =
            LOOPBACK_HOSTS.iter().map(|h| canonical_host(h)).collect();
        rejected.insert(canonical_host(listen_host));

        Self { rejected }
    }

    pub fn rejects(&self, upstream: &UpstreamAddr) -> bool {
        self.rejected.contains(upstream.host())
    }
}

/// A configured upstream that was left out of the forwarding list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectedUpstream {
    /// Points back at this server.
    LoopsBack(UpstreamAddr),
    /// Could never be dialed.
    Unparsable { input: String, reason: String },
}

/// Result of [`partition_upstreams`]: the usable list in configured order
/// plus everything that was dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedUpstreams {
    pub accepted: Vec<UpstreamAddr>,
    pub rejected: Vec<RejectedUpstream>,
}

/// Splits candidates into usable upstreams, normalized to `host:port` with
/// order preserved, and rejected ones.
pub fn partition_upstreams<I>(listen: &str, candidates: I) -> SanitizedUpstreams
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let guard = LoopGuard::for_listen_address(listen);
    let mut result = SanitizedUpstreams::default();

    for candidate in candidates {
        let candidate = candidate.as_ref();
        match UpstreamAddr::parse(candidate) {
            Ok(upstream) if guard.rejects(&upstream) => {
                result.rejected.push(RejectedUpstream::LoopsBack(upstream));
            }
            Ok(upstream) => result.accepted.push(upstream),
            Err(e) => result.rejected.push(RejectedUpstream::Unparsable {
                input: candidate.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    result
}

/// Drops every candidate that would make the server forward to itself and
/// every one that does not parse.
pub fn sanitize_upstreams<I>(listen: &str, candidates: I) -> Vec<UpstreamAddr>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    partition_upstreams(listen, candidates).accepted
}
