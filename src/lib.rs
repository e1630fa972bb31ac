pub mod config;
pub mod expr;
pub mod insight;
pub mod instrument;
pub mod output;
pub mod registry;
pub mod server;
pub mod snapshot;
pub mod status;
