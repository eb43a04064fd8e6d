// Library exports for the duel snake round engine
// The server binary and the replay tool both build on these modules

pub mod config;
pub mod engine;
pub mod food;
pub mod replay;
pub mod rules;
pub mod server;
pub mod session_log;
pub mod snake;
pub mod types;
