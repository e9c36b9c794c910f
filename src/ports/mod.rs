pub mod config_port;
pub mod journal_port;
