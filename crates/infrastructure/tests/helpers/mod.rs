mod builders;
mod dns_server_mock;

pub use builders::*;
pub use dns_server_mock::*;
