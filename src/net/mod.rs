//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! PortSpec (config)
//!     → port.rs (probe ports in range, first bindable wins)
//!     → listener.rs (bind the chosen port for real)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Probing binds and immediately releases each candidate
//! - A fixed port is a range of one, so both share one scan
//! - Host is parsed once; probes and final bind use the same address

pub mod listener;
pub mod port;

pub use listener::{bind, ListenerError};
pub use port::{find_port, PortError, PortRange};
