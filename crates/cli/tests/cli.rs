use std::path::Path;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn make_home() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
}

fn journey(home: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_journey"));
    cmd.args(args)
        .env("JOURNEY_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("JOURNEY_BACKEND_URL")
        .env_remove("JOURNEY_ANON_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn run(home: &Path, args: &[&str]) -> Output {
    journey(home, args).output().expect("run journey")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Minimal table backend: inserts succeed, selects return nothing, deletes
/// succeed. Returns the base URL and the request lines seen so far.
async fn spawn_stub_backend() -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            let log = Arc::clone(&log);
            tokio::spawn(async move { respond(socket, &log).await });
        }
    });

    (format!("http://{addr}"), seen)
}

async fn respond(mut socket: TcpStream, log: &Mutex<Vec<String>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if request_complete(&buf) {
            break;
        }
    }
    let request = String::from_utf8_lossy(&buf).to_string();
    let line = request.lines().next().unwrap_or_default().to_string();
    let (status, body) = if line.starts_with("POST") {
        ("201 Created", "")
    } else if line.starts_with("GET") {
        ("200 OK", "[]")
    } else {
        ("204 No Content", "")
    };
    log.lock().expect("log").push(line);
    let response = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

fn request_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(head_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let length = text[..head_end]
        .lines()
        .find_map(|l| {
            l.to_ascii_lowercase()
                .strip_prefix("content-length:")
                .and_then(|v| v.trim().parse::<usize>().ok())
        })
        .unwrap_or(0);
    buf.len() >= head_end + 4 + length
}

/// `journey` against the stub backend, run without blocking the runtime
/// that serves it.
async fn run_against(home: &Path, url: &str, args: &[&str]) -> Output {
    let mut cmd = tokio::process::Command::from(journey(home, args));
    cmd.env("JOURNEY_BACKEND_URL", url)
        .env("JOURNEY_ANON_KEY", "anon")
        .output()
        .await
        .expect("run journey")
}

#[test]
fn help_lists_every_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_journey"))
        .arg("--help")
        .output()
        .expect("run help");
    assert!(output.status.success());
    let out = stdout(&output);
    for command in [
        "new", "sign-in", "name", "whoami", "write", "list", "delete", "stats", "sign-out",
        "config", "tui",
    ] {
        assert!(out.contains(command), "missing {command} in help");
    }
}

#[test]
fn config_set_then_show_masks_the_anon_key() {
    let home = make_home();
    let set = run(
        home.path(),
        &[
            "config",
            "--url",
            "https://db.example.com/",
            "--anon-key",
            "eyJhbGciOiJIUzI1NiJ9.secret",
        ],
    );
    assert!(set.status.success(), "stderr: {}", stderr(&set));
    assert!(home.path().join("journey.toml").exists());

    let show = run(home.path(), &["config"]);
    assert!(show.status.success());
    let out = stdout(&show);
    assert!(out.contains("url          = https://db.example.com"));
    assert!(out.contains("anon_key     = eyJhbG..."));
    assert!(!out.contains("secret"));
}

#[test]
fn commands_fail_until_the_backend_is_configured() {
    let home = make_home();
    let output = run(home.path(), &["whoami"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: backend is not configured"));
}

#[test]
fn whoami_without_a_stored_key_makes_no_request() {
    let home = make_home();
    let output = journey(home.path(), &["whoami"])
        .env("JOURNEY_BACKEND_URL", "http://127.0.0.1:9")
        .env("JOURNEY_ANON_KEY", "anon")
        .output()
        .expect("run");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "Not signed in.");
}

#[test]
fn write_without_a_key_explains_how_to_start() {
    let home = make_home();
    let output = journey(home.path(), &["write", "hello", "world"])
        .env("JOURNEY_BACKEND_URL", "http://127.0.0.1:9")
        .env("JOURNEY_ANON_KEY", "anon")
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("journey new"));
}

#[tokio::test]
async fn new_registers_and_stores_a_key() {
    let home = make_home();
    let (url, seen) = spawn_stub_backend().await;

    let output = run_against(home.path(), &url, &["new"]).await;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    let key = out
        .lines()
        .find_map(|l| l.strip_prefix("Your access key: "))
        .expect("key printed")
        .trim()
        .to_string();
    assert!(out.contains("journey name"));

    let stored = std::fs::read_to_string(home.path().join("state").join("session.json"))
        .expect("session file");
    assert!(stored.contains(&key));
    assert!(
        seen.lock()
            .expect("log")
            .iter()
            .any(|l| l.starts_with("POST /rest/v1/keys "))
    );

    // The stub registry never returns the key, so the next run clears it.
    let whoami = run_against(home.path(), &url, &["whoami"]).await;
    assert!(whoami.status.success(), "stderr: {}", stderr(&whoami));
    assert_eq!(stdout(&whoami).trim(), "Not signed in.");
    assert!(stderr(&whoami).contains("no longer registered"));
}
