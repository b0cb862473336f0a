//! owobridge-osc/src/dispatcher.rs

use std::sync::Arc;
use rosc::{OscMessage, OscPacket, OscType};
use tracing::trace;

use crate::{OscError, Result};

/// Receives every decoded OSC message.
pub trait OscHandler: Send + Sync {
    fn handle_message(&self, address: &str, args: &[OscType]);
}

/// Routes messages to one default handler. There is no per-address table;
/// the handler decides what it cares about.
#[derive(Clone, Default)]
pub struct OscDispatcher {
    default_handler: Option<Arc<dyn OscHandler>>,
}

impl OscDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_default_handler(&mut self, handler: Arc<dyn OscHandler>) {
        self.default_handler = Some(handler);
    }

    /// Decode one UDP datagram and dispatch every message inside it.
    /// Returns how many messages were dispatched.
    pub fn dispatch_packet(&self, data: &[u8]) -> Result<usize> {
        let (_rest, packet) = rosc::decoder::decode_udp(data)
            .map_err(|e| OscError::Decode(format!("{e:?}")))?;
        Ok(self.dispatch(packet))
    }

    /// Dispatch an already decoded packet, flattening nested bundles.
    pub fn dispatch(&self, packet: OscPacket) -> usize {
        match packet {
            OscPacket::Message(msg) => {
                self.dispatch_message(msg);
                1
            }
            OscPacket::Bundle(bundle) => bundle
                .content
                .into_iter()
                .map(|p| self.dispatch(p))
                .sum(),
        }
    }

    fn dispatch_message(&self, msg: OscMessage) {
        trace!("OSC Message => addr='{}' args={:?}", msg.addr, msg.args);
        if let Some(handler) = &self.default_handler {
            handler.handle_message(&msg.addr, &msg.args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use rosc::{OscBundle, OscTime};

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl OscHandler for Recorder {
        fn handle_message(&self, address: &str, _args: &[OscType]) {
            self.0.lock().unwrap().push(address.to_string());
        }
    }

    fn recording_dispatcher() -> (OscDispatcher, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = OscDispatcher::new();
        dispatcher.set_default_handler(Arc::new(Recorder(seen.clone())));
        (dispatcher, seen)
    }

    #[test]
    fn decodes_and_dispatches_single_message() {
        let (dispatcher, seen) = recording_dispatcher();
        let packet = OscPacket::Message(OscMessage {
            addr: "/avatar/parameters/owo_suit_Arm_L".to_string(),
            args: vec![OscType::Bool(true)],
        });
        let buf = rosc::encoder::encode(&packet).unwrap();

        assert_eq!(dispatcher.dispatch_packet(&buf).unwrap(), 1);
        assert_eq!(*seen.lock().unwrap(), vec!["/avatar/parameters/owo_suit_Arm_L"]);
    }

    #[test]
    fn flattens_nested_bundles() {
        let (dispatcher, seen) = recording_dispatcher();
        let msg = |addr: &str| OscPacket::Message(OscMessage { addr: addr.to_string(), args: vec![] });
        let inner = OscPacket::Bundle(OscBundle {
            timetag: OscTime { seconds: 0, fractional: 1 },
            content: vec![msg("/b"), msg("/c")],
        });
        let outer = OscPacket::Bundle(OscBundle {
            timetag: OscTime { seconds: 0, fractional: 1 },
            content: vec![msg("/a"), inner],
        });
        let buf = rosc::encoder::encode(&outer).unwrap();

        assert_eq!(dispatcher.dispatch_packet(&buf).unwrap(), 3);
        assert_eq!(*seen.lock().unwrap(), vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let (dispatcher, seen) = recording_dispatcher();
        let err = dispatcher.dispatch_packet(&[0xff, 0x00, 0x01]).unwrap_err();
        assert!(matches!(err, OscError::Decode(_)));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn no_handler_is_fine() {
        let dispatcher = OscDispatcher::new();
        let packet = OscPacket::Message(OscMessage { addr: "/x".into(), args: vec![] });
        assert_eq!(dispatcher.dispatch(packet), 1);
    }
}
