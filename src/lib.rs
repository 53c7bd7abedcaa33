// A server for Trucão, the four-player trick-taking card game with
// escalating stakes. One match per process: four clients connect over TCP,
// exchange length-prefixed JSON messages, and play hands until a team
// reaches twelve points.

pub mod api;
pub mod config;
pub mod deck;
pub mod engine;
pub mod error;
pub mod net;
pub mod session;
pub mod types;
pub mod wire;
