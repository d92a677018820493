pub mod auth;
pub mod directory;
pub mod search;
pub mod server;
