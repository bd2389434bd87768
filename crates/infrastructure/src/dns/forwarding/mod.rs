mod codec;
mod forwarder;

pub use codec::{decode_message, encode_message};
pub use forwarder::DnsForwarder;
