mod handler;
mod socket;
mod tcp;
mod udp;

pub use handler::DnsServerHandler;

use crate::dns::cache::ResponseCache;
use crate::dns::forwarding::DnsForwarder;
use crate::jobs::CacheSweepJob;
use relay_dns_application::ports::UpstreamForwarder;
use relay_dns_application::use_cases::HandleDnsQueryUseCase;
use relay_dns_domain::config::DEFAULT_CACHE_SWEEP_INTERVAL;
use relay_dns_domain::{
    partition_upstreams, split_host_port, Config, DomainError, LocalRecordStore, RejectedUpstream,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// A configured but not yet bound DNS server.
pub struct DnsServer {
    listen: String,
    handler: Arc<DnsServerHandler>,
    cache: Arc<ResponseCache>,
    sweep_interval: Duration,
}

impl DnsServer {
    /// Wires the local zone, a fresh response cache and `forwarder` into a
    /// query handler. The forwarder is used as given.
    pub fn new(
        listen: impl Into<String>,
        records: LocalRecordStore,
        forwarder: Arc<dyn UpstreamForwarder>,
        ttl: u32,
    ) -> Self {
        let cache = Arc::new(ResponseCache::new());
        let use_case = Arc::new(HandleDnsQueryUseCase::new(
            Arc::new(records),
            cache.clone(),
            forwarder,
            ttl,
        ));

        Self {
            listen: listen.into(),
            handler: Arc::new(DnsServerHandler::new(use_case)),
            cache,
            sweep_interval: DEFAULT_CACHE_SWEEP_INTERVAL,
        }
    }

    /// Builds the server from validated configuration, dropping every
    /// upstream that would loop back to this server.
    pub fn from_config(config: &Config) -> Result<Self, DomainError> {
        let records = LocalRecordStore::from_records(&config.dns.records)?;
        let sanitized = partition_upstreams(&config.server.listen, &config.dns.upstream);
        for rejected in &sanitized.rejected {
            match rejected {
                RejectedUpstream::LoopsBack(addr) => {
                    warn!(upstream = %addr, "Dropping upstream that points back at this server");
                }
                RejectedUpstream::Unparsable { input, reason } => {
                    warn!(upstream = %input, error = %reason, "Dropping unparsable upstream");
                }
            }
        }
        let upstreams = sanitized.accepted;

        if upstreams.is_empty() {
            warn!("No usable upstream servers; non-local queries will be answered with SERVFAIL");
        }
        info!(
            upstreams = ?upstreams.iter().map(ToString::to_string).collect::<Vec<_>>(),
            local_records = records.len(),
            ttl = config.dns.ttl,
            "DNS server configured"
        );

        let forwarder = Arc::new(DnsForwarder::new(upstreams, config.dns.query_timeout()));
        Ok(
            Self::new(config.server.listen.clone(), records, forwarder, config.dns.ttl)
                .with_sweep_interval(config.dns.cache_sweep_interval()),
        )
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Binds UDP first and then TCP on the very same port, so an ephemeral
    /// `:0` listen address yields one shared port for both transports.
    pub async fn bind(self) -> Result<BoundDnsServer, DomainError> {
        let socket_addr = resolve_listen_address(&self.listen).await?;

        let udp = socket::create_udp_socket(socket_addr).map_err(|e| DomainError::ListenerBind {
            transport: "udp",
            addr: socket_addr.to_string(),
            reason: e.to_string(),
        })?;
        let local_addr = udp.local_addr().map_err(|e| DomainError::ListenerBind {
            transport: "udp",
            addr: socket_addr.to_string(),
            reason: e.to_string(),
        })?;

        let tcp = socket::create_tcp_listener(local_addr).map_err(|e| DomainError::ListenerBind {
            transport: "tcp",
            addr: local_addr.to_string(),
            reason: e.to_string(),
        })?;

        info!(address = %local_addr, "DNS listeners bound (UDP + TCP)");

        Ok(BoundDnsServer {
            udp: Arc::new(udp),
            tcp,
            local_addr,
            handler: self.handler,
            cache: self.cache,
            sweep_interval: self.sweep_interval,
        })
    }

    /// Binds and serves until `shutdown` fires or a listener fails.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), DomainError> {
        self.bind().await?.serve(shutdown).await
    }
}

/// A DNS server whose sockets are bound and ready to serve.
pub struct BoundDnsServer {
    udp: Arc<UdpSocket>,
    tcp: TcpListener,
    local_addr: SocketAddr,
    handler: Arc<DnsServerHandler>,
    cache: Arc<ResponseCache>,
    sweep_interval: Duration,
}

impl BoundDnsServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn cache(&self) -> Arc<ResponseCache> {
        Arc::clone(&self.cache)
    }

    /// Serves both transports and the cache sweeper.
    ///
    /// Returns `Ok(())` after `shutdown` fires, or the first listener error;
    /// either way the sibling listener and the sweeper are stopped and
    /// in-flight queries get [`SHUTDOWN_GRACE`] to finish.
    pub async fn serve(self, shutdown: CancellationToken) -> Result<(), DomainError> {
        let stop = shutdown.child_token();
        let tracker = TaskTracker::new();

        tracker.spawn(
            CacheSweepJob::new(self.cache)
                .with_interval(self.sweep_interval)
                .with_cancellation(stop.clone())
                .run(),
        );

        let mut listeners = JoinSet::new();
        listeners.spawn(udp::serve_udp(
            self.udp,
            Arc::clone(&self.handler),
            stop.clone(),
            tracker.clone(),
        ));
        listeners.spawn(tcp::serve_tcp(
            self.tcp,
            self.handler,
            stop.clone(),
            tracker.clone(),
        ));

        info!(address = %self.local_addr, "DNS server ready");

        let result = tokio::select! {
            _ = stop.cancelled() => Ok(()),
            Some(joined) = listeners.join_next() => flatten_listener(joined),
        };

        stop.cancel();
        while let Some(joined) = listeners.join_next().await {
            if let Err(e) = flatten_listener(joined) {
                error!(error = %e, "Listener stopped with error");
            }
        }

        tracker.close();
        if tokio::time::timeout(SHUTDOWN_GRACE, tracker.wait()).await.is_err() {
            warn!(
                pending = tracker.len(),
                "In-flight queries did not finish within the shutdown grace period"
            );
        }

        match &result {
            Ok(()) => info!("DNS server stopped"),
            Err(e) => error!(error = %e, "DNS server stopped after listener failure"),
        }
        result
    }
}

fn flatten_listener(
    joined: Result<Result<(), DomainError>, tokio::task::JoinError>,
) -> Result<(), DomainError> {
    joined.unwrap_or_else(|e| {
        Err(DomainError::ListenerFailed {
            transport: "dns",
            reason: e.to_string(),
        })
    })
}

/// `:53` binds every IPv4 interface; a host name is resolved once at bind
/// time.
async fn resolve_listen_address(listen: &str) -> Result<SocketAddr, DomainError> {
    let (host, port) = split_host_port(listen)
        .ok_or_else(|| DomainError::InvalidListenAddress(listen.to_string()))?;
    let port: u16 = port
        .parse()
        .map_err(|_| DomainError::InvalidListenAddress(listen.to_string()))?;

    if host.is_empty() {
        return Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port));
    }
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| DomainError::InvalidListenAddress(format!("{}: {}", listen, e)))?
        .next()
        .ok_or_else(|| DomainError::InvalidListenAddress(listen.to_string()))
}
