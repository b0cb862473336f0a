// src/lib.rs

pub mod address_map;
pub mod collision;
pub mod config;
pub mod connection;
pub mod eventbus;
pub mod owo_suit;
pub mod sender;
pub mod state;
pub mod suit;

pub use address_map::AddressMap;
pub use config::AppConfig;
pub use owo_suit::OwoSuit;
pub use owobridge_common::error::Error;
pub use owobridge_common::models;
