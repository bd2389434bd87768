pub mod cache;
pub mod forwarding;
pub mod server;
pub mod transport;

pub use cache::ResponseCache;
pub use forwarding::DnsForwarder;
pub use server::{BoundDnsServer, DnsServer, DnsServerHandler};
