//! Wire messages.
//!
//! Every message is one JSON object per line with a `type` tag:
//!
//! | direction | `type`     | body                                          |
//! |-----------|------------|-----------------------------------------------|
//! | in        | `start`    | `payload`: grid, algorithm and search options |
//! | in        | `step`     | none                                          |
//! | in        | `reset`    | none                                          |
//! | in        | `restart`  | none                                          |
//! | out       | `ok`       | none                                          |
//! | out       | `snapshot` | frontier fields inline                        |
//! | out       | `finished` | path and final frontier fields inline         |
//! | out       | `error`    | `message`, `kind`                             |
//!
//! Decoding happens in two stages. [`Request`] mirrors the JSON loosely
//! (wide integers, names as strings) so that any well-formed message
//! decodes; [`Command::try_from`] then checks the values and builds engine
//! types. Failures in the first stage are protocol errors, failures in the
//! second are configuration errors.

use gridstep_core::{Cell, CornerPolicy, GridConfig};
use gridstep_paths::{Algorithm, Finished, Heuristic, SearchParams, SessionError, Snapshot};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// A decoded but unchecked request line.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Start { payload: StartPayload },
    Step,
    Reset,
    Restart,
}

/// Body of a `start` request as sent by the client.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StartPayload {
    pub size: i64,
    #[serde(default)]
    pub obstacles: Vec<(i64, i64)>,
    pub start: (i64, i64),
    pub goal: (i64, i64),
    #[serde(default = "default_diagonal")]
    pub diagonal: bool,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_heuristic")]
    pub heuristic: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_corner")]
    pub corner: String,
    #[serde(default)]
    pub waypoints: Vec<(i64, i64)>,
}

fn default_diagonal() -> bool {
    true
}

fn default_algorithm() -> String {
    Algorithm::default().name().to_string()
}

fn default_heuristic() -> String {
    Heuristic::default().name().to_string()
}

fn default_weight() -> f64 {
    1.0
}

fn default_corner() -> String {
    CornerPolicy::default().name().to_string()
}

/// A checked request, ready for a session.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Start {
        config: GridConfig,
        params: SearchParams,
    },
    Step,
    Reset,
    Restart,
}

impl Command {
    /// Decode and check one request line.
    pub fn parse(line: &str) -> Result<Self, RequestError> {
        let request: Request =
            serde_json::from_str(line).map_err(|e| RequestError::Malformed(e.to_string()))?;
        Self::try_from(request)
    }
}

impl TryFrom<Request> for Command {
    type Error = RequestError;

    fn try_from(request: Request) -> Result<Self, Self::Error> {
        Ok(match request {
            Request::Start { payload } => {
                let (config, params) = payload.into_engine()?;
                Command::Start { config, params }
            }
            Request::Step => Command::Step,
            Request::Reset => Command::Reset,
            Request::Restart => Command::Restart,
        })
    }
}

impl StartPayload {
    fn into_engine(self) -> Result<(GridConfig, SearchParams), RequestError> {
        let size = i32::try_from(self.size).map_err(|_| RequestError::SizeRange(self.size))?;
        let algorithm = Algorithm::from_name(&self.algorithm)
            .ok_or_else(|| RequestError::UnknownAlgorithm(self.algorithm.clone()))?;
        let heuristic = Heuristic::from_name(&self.heuristic)
            .ok_or_else(|| RequestError::UnknownHeuristic(self.heuristic.clone()))?;
        let corner = CornerPolicy::from_name(&self.corner)
            .ok_or_else(|| RequestError::UnknownCorner(self.corner.clone()))?;

        let obstacles = self
            .obstacles
            .iter()
            .map(|&c| to_cell("obstacle", c))
            .collect::<Result<Vec<_>, _>>()?;
        let waypoints = self
            .waypoints
            .iter()
            .map(|&c| to_cell("waypoint", c))
            .collect::<Result<Vec<_>, _>>()?;

        let config = GridConfig::new(size, to_cell("start", self.start)?, to_cell("goal", self.goal)?)
            .with_obstacles(obstacles)
            .with_diagonal(self.diagonal)
            .with_corner(corner);
        let params = SearchParams::new(algorithm)
            .with_heuristic(heuristic)
            .with_weight(self.weight)
            .with_waypoints(waypoints);
        Ok((config, params))
    }
}

fn to_cell(what: &'static str, (x, y): (i64, i64)) -> Result<Cell, RequestError> {
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => Ok(Cell::new(x, y)),
        _ => Err(RequestError::CoordinateRange { what, x, y }),
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Error category reported to the client.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request was understood but its values are unacceptable.
    Configuration,
    /// The line was not a recognizable request.
    Protocol,
    /// The request is not valid in the session's current state.
    State,
}

/// One reply line.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok,
    Snapshot(Snapshot),
    Finished(Finished),
    Error { message: String, kind: ErrorKind },
}

impl Response {
    pub fn error(err: &RequestError) -> Self {
        Response::Error {
            message: err.to_string(),
            kind: err.kind(),
        }
    }

    /// Serialize as a single line, without the trailing newline.
    pub fn to_line(&self) -> String {
        // Every field is a plain number, string or sequence, so this cannot
        // fail; fall back to a fixed error line rather than panicking.
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("failed to encode response: {}", e);
            r#"{"type":"error","message":"internal encoding failure","kind":"state"}"#.to_string()
        })
    }
}

/// Why a request line was not carried out.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("request line exceeds {0} byte limit")]
    LineTooLong(usize),

    #[error("grid size {0} is out of range")]
    SizeRange(i64),

    #[error("{what} coordinate ({x}, {y}) is out of range")]
    CoordinateRange { what: &'static str, x: i64, y: i64 },

    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),

    #[error("unknown heuristic '{0}'")]
    UnknownHeuristic(String),

    #[error("unknown corner policy '{0}'")]
    UnknownCorner(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl RequestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Malformed(_) | Self::LineTooLong(_) => ErrorKind::Protocol,
            Self::Session(e) if !e.is_config() => ErrorKind::State,
            _ => ErrorKind::Configuration,
        }
    }
}
