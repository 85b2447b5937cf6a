//! TCP transport: newline-delimited JSON, one thread and one session per
//! connection.

use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::dispatch::handle_line;
use crate::error::{Result, ServerError};
use crate::protocol::{ErrorKind, RequestError, Response};
use crate::registry::{SessionId, SessionRegistry};

/// Monotonic connection counter for log correlation. Never resets.
static CONNECTION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// How long the accept loop sleeps when no client is waiting.
const ACCEPT_POLL: Duration = Duration::from_millis(10);

/// Read one line of at most `max_bytes` bytes (newline included) into `buf`.
///
/// Returns the number of bytes consumed, 0 at end of stream. A longer line
/// is drained up to and including its newline and reported as
/// [`io::ErrorKind::InvalidData`], leaving the reader at the start of the
/// next line.
pub fn read_line_bounded<R: BufRead>(
    reader: &mut R,
    buf: &mut String,
    max_bytes: usize,
) -> io::Result<usize> {
    let mut total = 0usize;
    let mut raw = Vec::new();

    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            break;
        }
        let (end, found_newline) = match available.iter().position(|&b| b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (available.len(), false),
        };

        if total + end > max_bytes {
            reader.consume(end);
            if !found_newline {
                loop {
                    let rest = reader.fill_buf()?;
                    if rest.is_empty() {
                        break;
                    }
                    match rest.iter().position(|&b| b == b'\n') {
                        Some(pos) => {
                            reader.consume(pos + 1);
                            break;
                        }
                        None => {
                            let n = rest.len();
                            reader.consume(n);
                        }
                    }
                }
            }
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line exceeds {} byte limit", max_bytes),
            ));
        }

        raw.extend_from_slice(&available[..end]);
        total += end;
        reader.consume(end);
        if found_newline {
            break;
        }
    }

    buf.push_str(&String::from_utf8_lossy(&raw));
    Ok(total)
}

/// Stops a running [`Server`] from another thread.
#[derive(Clone, Debug)]
pub struct ShutdownHandle {
    running: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

/// Decrements the active-connection count when a connection thread ends.
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// The listening server.
pub struct Server {
    listener: TcpListener,
    registry: Arc<SessionRegistry>,
    running: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
    max_connections: usize,
    max_line_bytes: usize,
}

impl Server {
    /// Bind the listener described by `config`.
    pub fn bind(config: &ServerConfig) -> Result<Self> {
        let addr = &config.network.bind_address;
        let listener = TcpListener::bind(addr).map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            registry: Arc::new(SessionRegistry::new(config.limits.max_grid_size)),
            running: Arc::new(AtomicBool::new(true)),
            active: Arc::new(AtomicUsize::new(0)),
            max_connections: config.network.max_connections,
            max_line_bytes: config.network.max_line_bytes,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Accept clients until shut down. Connections already open are served
    /// until their clients disconnect.
    pub fn run(self) -> Result<()> {
        log::info!(
            "listening on {} (max_connections={}, max_line_bytes={})",
            self.local_addr()?,
            self.max_connections,
            self.max_line_bytes
        );

        while self.running.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, addr)) => self.accept(stream, addr),
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL);
                }
                Err(e) => {
                    log::error!("accept error: {}", e);
                }
            }
        }

        log::info!(
            "stopped accepting; {} connection(s) still open",
            self.active.load(Ordering::Relaxed)
        );
        Ok(())
    }

    fn accept(&self, stream: TcpStream, addr: SocketAddr) {
        let conn_id = CONNECTION_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tag = format!("C{:03}", conn_id);

        if let Err(e) = stream.set_nonblocking(false) {
            log::error!("[{}] failed to set blocking mode: {}", tag, e);
            return;
        }

        let active = self.active.fetch_add(1, Ordering::Relaxed) + 1;
        let guard = ActiveGuard(Arc::clone(&self.active));
        if active > self.max_connections {
            log::warn!(
                "[{}] rejecting {}: {} connections already open",
                tag,
                addr,
                self.max_connections
            );
            reject(stream, self.max_connections);
            return;
        }
        log::info!("[{}] client connected: {} (active={})", tag, addr, active);

        let registry = Arc::clone(&self.registry);
        let max_line_bytes = self.max_line_bytes;
        let thread_tag = tag.clone();
        let spawned = thread::Builder::new()
            .name(format!("conn-{}", tag))
            .spawn(move || {
                let _guard = guard;
                if let Err(e) = serve(stream, &registry, max_line_bytes, &thread_tag) {
                    log::warn!("[{}] connection error: {}", thread_tag, e);
                }
                log::info!("[{}] client disconnected: {}", thread_tag, addr);
            });
        if let Err(e) = spawned {
            log::error!("[{}] failed to spawn connection thread: {}", tag, e);
        }
    }
}

fn reject(mut stream: TcpStream, max_connections: usize) {
    let busy = Response::Error {
        message: format!("server busy: {} connections already open", max_connections),
        kind: ErrorKind::State,
    };
    let _ = writeln!(stream, "{}", busy.to_line());
    let _ = stream.shutdown(Shutdown::Both);
}

/// Serve one connection on its own session until the client goes away.
fn serve(
    stream: TcpStream,
    registry: &SessionRegistry,
    max_line_bytes: usize,
    tag: &str,
) -> io::Result<()> {
    let id = registry.open();
    log::debug!("[{}] bound to session {}", tag, id);
    let result = serve_session(stream, registry, id, max_line_bytes, tag);
    registry.close(id);
    result
}

fn serve_session(
    stream: TcpStream,
    registry: &SessionRegistry,
    id: SessionId,
    max_line_bytes: usize,
    tag: &str,
) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        let response = match read_line_bounded(&mut reader, &mut line, max_line_bytes) {
            Ok(0) => return Ok(()),
            Ok(_) => {
                let request = line.trim();
                if request.is_empty() {
                    continue;
                }
                log::debug!("[{}] <- {}", tag, request);
                handle_line(registry, id, request)
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                log::warn!("[{}] {}", tag, e);
                Response::error(&RequestError::LineTooLong(max_line_bytes))
            }
            Err(e) => return Err(e),
        };
        writer.write_all(response.to_line().as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
}
