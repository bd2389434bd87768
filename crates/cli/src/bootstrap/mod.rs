pub mod config;
pub mod logging;
pub mod shutdown;

pub use config::load_config;
pub use logging::init_logging;
pub use shutdown::spawn_signal_listener;
