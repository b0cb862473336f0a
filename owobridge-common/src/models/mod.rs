pub mod connection;
pub mod events;
pub mod muscle;
pub mod sensation;

pub use connection::ConnectionState;
pub use events::{ControlCommand, SuitEvent};
pub use muscle::Muscle;
pub use sensation::Sensation;
