//! **gridstep-server**: serves stepwise grid searches over TCP.
//!
//! Each client connection gets its own [`SearchSession`](gridstep_paths::SearchSession)
//! and talks to it in newline-delimited JSON: `start` a search, `step` it one
//! expansion at a time and watch the frontier in the returned snapshots,
//! `reset` or `restart` it. See [`protocol`] for the message set.
//!
//! The engine never steps on its own; continuous playback is a client
//! sending `step` at its chosen cadence.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod transport;

pub use config::ServerConfig;
pub use dispatch::handle_line;
pub use error::{Result, ServerError};
pub use protocol::{Command, ErrorKind, Request, RequestError, Response};
pub use registry::{SessionId, SessionRegistry};
pub use transport::{Server, ShutdownHandle};
