//! End-to-end sessions over a real TCP socket.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread::{self, JoinHandle};

use gridstep_server::{Server, ServerConfig, ShutdownHandle};
use serde_json::{Value, json};

struct Running {
    addr: SocketAddr,
    shutdown: ShutdownHandle,
    thread: Option<JoinHandle<()>>,
}

impl Running {
    fn start(max_connections: usize) -> Self {
        let mut config = ServerConfig::default();
        config.network.bind_address = "127.0.0.1:0".to_string();
        config.network.max_connections = max_connections;
        config.network.max_line_bytes = 256;
        let server = Server::bind(&config).unwrap();
        let addr = server.local_addr().unwrap();
        let shutdown = server.shutdown_handle();
        let thread = thread::spawn(move || server.run().unwrap());
        Self {
            addr,
            shutdown,
            thread: Some(thread),
        }
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        self.shutdown.shutdown();
        if let Some(t) = self.thread.take() {
            let _ = t.join();
        }
    }
}

struct Client {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Client {
    fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).unwrap();
        Self {
            reader: BufReader::new(stream.try_clone().unwrap()),
            writer: stream,
        }
    }

    fn read(&mut self) -> Value {
        let mut line = String::new();
        self.reader.read_line(&mut line).unwrap();
        serde_json::from_str(&line).unwrap()
    }

    fn send_raw(&mut self, line: &str) -> Value {
        self.writer.write_all(line.as_bytes()).unwrap();
        self.writer.write_all(b"\n").unwrap();
        self.read()
    }

    fn send(&mut self, msg: Value) -> Value {
        self.send_raw(&msg.to_string())
    }
}

fn start_msg() -> Value {
    json!({
        "type": "start",
        "payload": {
            "size": 3,
            "start": [0, 0],
            "goal": [2, 2],
            "diagonal": true,
            "algorithm": "dijkstra"
        }
    })
}

#[test]
fn search_runs_to_completion() {
    let server = Running::start(4);
    let mut c = Client::connect(server.addr);

    assert_eq!(c.send(start_msg()), json!({"type": "ok"}));

    let first = c.send(json!({"type": "step"}));
    assert_eq!(first["type"], "snapshot");
    assert_eq!(first["current"], json!([0, 0]));
    assert_eq!(first["stats"]["expanded"], 1);
    assert_eq!(first["closed"], json!([[0, 0]]));

    let mut last = first;
    for _ in 0..20 {
        if last["type"] == "finished" {
            break;
        }
        last = c.send(json!({"type": "step"}));
    }
    assert_eq!(last["type"], "finished");
    assert_eq!(last["path"], json!([[0, 0], [1, 1], [2, 2]]));
    let cost = last["stats"]["cost"].as_f64().unwrap();
    assert!((cost - 2.0 * std::f64::consts::SQRT_2).abs() < 1e-9);

    let after = c.send(json!({"type": "step"}));
    assert_eq!(after["type"], "error");
    assert_eq!(after["kind"], "state");
}

#[test]
fn errors_do_not_close_the_connection() {
    let server = Running::start(4);
    let mut c = Client::connect(server.addr);

    let bad = c.send_raw("this is not json");
    assert_eq!(bad["type"], "error");
    assert_eq!(bad["kind"], "protocol");

    let long = format!(r#"{{"type":"step","pad":"{}"}}"#, "x".repeat(1000));
    let too_long = c.send_raw(&long);
    assert_eq!(too_long["kind"], "protocol");

    let same = json!({
        "type": "start",
        "payload": {"size": 3, "start": [1, 1], "goal": [1, 1]}
    });
    let r = c.send(same);
    assert_eq!(r["kind"], "configuration");

    assert_eq!(c.send(start_msg()), json!({"type": "ok"}));
    assert_eq!(c.send(json!({"type": "reset"})), json!({"type": "ok"}));
    assert_eq!(c.send(json!({"type": "restart"})), json!({"type": "ok"}));
    assert_eq!(c.send(json!({"type": "step"}))["type"], "snapshot");
}

#[test]
fn connections_have_separate_sessions() {
    let server = Running::start(4);
    let mut a = Client::connect(server.addr);
    let mut b = Client::connect(server.addr);

    assert_eq!(a.send(start_msg()), json!({"type": "ok"}));
    let r = b.send(json!({"type": "step"}));
    assert_eq!(r["message"], "no active search");
    assert_eq!(a.send(json!({"type": "step"}))["type"], "snapshot");
}

#[test]
fn extra_clients_are_turned_away() {
    let server = Running::start(1);
    let mut first = Client::connect(server.addr);
    // A reply proves the first connection holds the only slot.
    assert_eq!(first.send(json!({"type": "reset"})), json!({"type": "ok"}));

    let mut second = Client::connect(server.addr);
    let busy = second.read();
    assert_eq!(busy["type"], "error");
    assert!(busy["message"].as_str().unwrap().contains("busy"));

    assert_eq!(first.send(start_msg()), json!({"type": "ok"}));
}
