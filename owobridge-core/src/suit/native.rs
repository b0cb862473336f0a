//! src/suit/native.rs
//!
//! Drives the vendor SDK through a small C-ABI shim library loaded at runtime.
//! The shim must export:
//!
//! ```text
//! void owo_connect(const char *ip);
//! void owo_auto_connect(void);
//! int  owo_connection_state(void);   // 0 = disconnected, 1 = connecting, 2 = connected
//! void owo_send(int frequency, float duration, float intensity,
//!               float ramp_up, float ramp_down, float exit_delay, int muscle);
//! ```

use std::ffi::{CString, c_char, c_int};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use libloading::Library;
use tracing::{debug, warn};

use crate::Error;
use crate::models::{ConnectionState, Muscle, Sensation};
use crate::suit::SuitBackend;

type ConnectFn = unsafe extern "C" fn(*const c_char);
type AutoConnectFn = unsafe extern "C" fn();
type ConnectionStateFn = unsafe extern "C" fn() -> c_int;
type SendFn = unsafe extern "C" fn(c_int, f32, f32, f32, f32, f32, c_int);

pub struct NativeSuit {
    // keeps the function pointers below valid
    lib: Arc<Library>,
    connect_fn: ConnectFn,
    auto_connect_fn: AutoConnectFn,
    connection_state_fn: ConnectionStateFn,
    send_fn: SendFn,
}

impl NativeSuit {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!("Loading suit library from {}", path.display());
        // SAFETY: the shim is trusted configuration, and every symbol is
        // checked against the signatures documented above.
        unsafe {
            let lib = Library::new(path)?;
            let connect_fn = *lib.get::<ConnectFn>(b"owo_connect\0")?;
            let auto_connect_fn = *lib.get::<AutoConnectFn>(b"owo_auto_connect\0")?;
            let connection_state_fn = *lib.get::<ConnectionStateFn>(b"owo_connection_state\0")?;
            let send_fn = *lib.get::<SendFn>(b"owo_send\0")?;
            Ok(Self {
                lib: Arc::new(lib),
                connect_fn,
                auto_connect_fn,
                connection_state_fn,
                send_fn,
            })
        }
    }

    /// Run a shim call on the blocking pool.
    async fn call_blocking<T, F>(f: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        Ok(tokio::task::spawn_blocking(f).await?)
    }

    fn state_from_raw(raw: c_int) -> ConnectionState {
        match raw {
            2 => ConnectionState::Connected,
            1 => ConnectionState::Connecting,
            _ => ConnectionState::Disconnected,
        }
    }
}

#[async_trait]
impl SuitBackend for NativeSuit {
    async fn connect(&self, ip: &str) -> Result<(), Error> {
        let ip = CString::new(ip).map_err(|e| Error::Suit(format!("Bad IP string: {e}")))?;
        let f = self.connect_fn;
        let lib = self.lib.clone();
        Self::call_blocking(move || {
            let _lib = lib;
            // SAFETY: `ip` outlives the call and the library is held alive.
            unsafe { f(ip.as_ptr()) }
        })
        .await?;
        Ok(())
    }

    async fn auto_connect(&self) -> Result<(), Error> {
        let f = self.auto_connect_fn;
        let lib = self.lib.clone();
        Self::call_blocking(move || {
            let _lib = lib;
            // SAFETY: no arguments; the library is held alive.
            unsafe { f() }
        })
        .await?;
        Ok(())
    }

    async fn connection_state(&self) -> ConnectionState {
        let f = self.connection_state_fn;
        let lib = self.lib.clone();
        let raw = Self::call_blocking(move || {
            let _lib = lib;
            // SAFETY: plain getter; the library is held alive.
            unsafe { f() }
        })
        .await;
        match raw {
            Ok(raw) => Self::state_from_raw(raw),
            Err(e) => {
                warn!("Reading suit connection state failed: {e}");
                ConnectionState::Disconnected
            }
        }
    }

    async fn send(&self, sensation: &Sensation, muscle: Muscle) -> Result<(), Error> {
        let f = self.send_fn;
        let lib = self.lib.clone();
        let s = sensation.clone();
        Self::call_blocking(move || {
            let _lib = lib;
            // SAFETY: all arguments are plain values; the library is held alive.
            unsafe {
                f(
                    s.frequency as c_int,
                    s.duration,
                    s.intensity,
                    s.ramp_up,
                    s.ramp_down,
                    s.exit_delay,
                    muscle.vendor_index() as c_int,
                )
            }
        })
        .await?;
        Ok(())
    }
}
