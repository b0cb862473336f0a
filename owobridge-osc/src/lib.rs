//! owobridge-osc/src/lib.rs
//!
//! OSC transport for the bridge: receive datagrams, decode them with `rosc`
//! and hand each message to a single default handler.

pub mod dispatcher;
pub mod listener;

pub use dispatcher::{OscDispatcher, OscHandler};
pub use listener::OscListener;
pub use rosc::OscType;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OscError {
    #[error("OSC I/O error: {0}")]
    IoError(String),

    #[error("OSC decode error: {0}")]
    Decode(String),

    #[error("Generic error: {0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, OscError>;

impl From<OscError> for owobridge_common::error::Error {
    fn from(e: OscError) -> Self {
        owobridge_common::error::Error::Osc(e.to_string())
    }
}
