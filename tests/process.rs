//! Process-level tests: run the built binary and check its console and exit status.
#![cfg(unix)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;

fn server_command(root: &TempDir, port: u16) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_static_cors_server"));
    cmd.current_dir(root.path())
        .env("STATIC_SERVER__HOST", "127.0.0.1")
        .env("STATIC_SERVER__PORT", port.to_string())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn wait_with_deadline(child: &mut Child, deadline: Duration) -> ExitStatus {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status;
        }
        if started.elapsed() > deadline {
            child.kill().ok();
            panic!("server process did not exit within {deadline:?}");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

#[test]
fn test_startup_lines_access_log_and_clean_stop() {
    let root = TempDir::new().unwrap();
    let port = free_port();
    let mut child = server_command(&root, port).spawn().unwrap();

    let mut stdout = BufReader::new(child.stdout.take().unwrap());
    let mut first = String::new();
    let mut second = String::new();
    stdout.read_line(&mut first).unwrap();
    stdout.read_line(&mut second).unwrap();

    assert_eq!(first.trim_end(), format!("Starting server on 127.0.0.1:{port}"));
    assert!(second.starts_with("Serving files from: "), "{second}");
    let dir_name = root.path().file_name().unwrap().to_string_lossy();
    assert!(second.trim_end().ends_with(dir_name.as_ref()), "{second}");

    let mut conn = TcpStream::connect(("127.0.0.1", port)).unwrap();
    conn.write_all(b"GET /missing.txt HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .unwrap();
    let mut reply = String::new();
    conn.read_to_string(&mut reply).unwrap();
    assert!(reply.starts_with("HTTP/1.1 404"), "{reply}");

    let term = Command::new("kill")
        .arg("-TERM")
        .arg(child.id().to_string())
        .status()
        .unwrap();
    assert!(term.success());

    let status = wait_with_deadline(&mut child, Duration::from_secs(10));
    assert!(status.success(), "{status:?}");

    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();
    assert_eq!(rest.trim(), "Server stopped");

    let mut stderr = String::new();
    child.stderr.take().unwrap().read_to_string(&mut stderr).unwrap();
    assert!(stderr.contains("\"GET /missing.txt HTTP/1.1\" 404"), "{stderr}");
}

#[test]
fn test_port_in_use_exits_non_zero() {
    let root = TempDir::new().unwrap();
    let holder = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = holder.local_addr().unwrap().port();

    let mut child = server_command(&root, port).spawn().unwrap();
    let status = wait_with_deadline(&mut child, Duration::from_secs(10));
    assert!(!status.success(), "{status:?}");

    let mut stderr = String::new();
    child.stderr.take().unwrap().read_to_string(&mut stderr).unwrap();
    assert!(stderr.contains("Failed to bind"), "{stderr}");

    drop(holder);
}
