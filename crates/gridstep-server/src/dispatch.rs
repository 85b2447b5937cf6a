//! Request dispatch: one request line in, one response out.
//!
//! Nothing here touches a socket, so the whole protocol can be exercised
//! against a [`SessionRegistry`] directly.

use gridstep_paths::StepOutcome;

use crate::protocol::{Command, ErrorKind, RequestError, Response};
use crate::registry::{SessionId, SessionRegistry};

impl From<StepOutcome> for Response {
    fn from(outcome: StepOutcome) -> Self {
        match outcome {
            StepOutcome::Snapshot(s) => Response::Snapshot(s),
            StepOutcome::Finished(f) => Response::Finished(f),
        }
    }
}

/// Decode `line` and run it against session `id`.
pub fn handle_line(registry: &SessionRegistry, id: SessionId, line: &str) -> Response {
    match Command::parse(line) {
        Ok(command) => execute(registry, id, command),
        Err(e) => {
            log::warn!("session {}: rejected request: {}", id, e);
            Response::error(&e)
        }
    }
}

/// Run a checked command against session `id`.
pub fn execute(registry: &SessionRegistry, id: SessionId, command: Command) -> Response {
    let Some(handle) = registry.get(id) else {
        return Response::Error {
            message: format!("unknown session {}", id),
            kind: ErrorKind::State,
        };
    };
    let mut session = handle.lock().unwrap_or_else(|e| e.into_inner());

    let result = match command {
        Command::Start { config, params } => session.start(config, params).map(|()| Response::Ok),
        Command::Step => session.step().map(Response::from),
        Command::Reset => {
            session.reset();
            Ok(Response::Ok)
        }
        Command::Restart => session.restart().map(|()| Response::Ok),
    };

    result.unwrap_or_else(|e| {
        log::warn!("session {}: {}", id, e);
        Response::error(&RequestError::from(e))
    })
}
