// Real Mute marketing automation - API core
//
// This crate provides the backend API for generating marketing copy through
// a chain of text-generation providers and publishing it to social networks.
// State is in-memory only; everything resets on restart.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
