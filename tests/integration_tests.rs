//! Integration tests for siterisk.
//!
//! These drive the compiled binary end to end without relying on external
//! network services: pages are served by a one-shot HTTP server on the
//! loopback interface, and WHOIS / DNS are switched off.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::str;
use std::thread;
use tempfile::NamedTempFile;

/// Helper to get the path to the compiled binary
fn get_binary_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    if path.ends_with("deps") {
        path.pop(); // Remove "deps" directory
    }
    path.push("siterisk");
    path
}

/// Serve `body` as text/html to `requests` connections, return the base URL.
fn serve_html(body: &'static str, requests: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming().take(requests) {
            let mut stream = stream.unwrap();
            let mut buf = [0u8; 4096];
            let mut request = Vec::new();
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        }
    });
    format!("http://{addr}/")
}

/// Port 9 (discard) on loopback is closed in test environments.
const UNREACHABLE_URL: &str = "http://127.0.0.1:9/";

const GAMBLING_PAGE: &str = "<html><head><title>Nhà cái uy tín</title></head>\
    <body><h1>Casino online</h1><p>Chơi baccarat, poker và tài xỉu</p></body></html>";

const NEWS_PAGE: &str = "<html><head><title>Thể thao</title></head>\
    <body><p>Tin tức thể thao hôm nay, bóng đá Việt Nam vô địch</p></body></html>";

fn offline_command() -> Command {
    let mut cmd = Command::new(get_binary_path());
    cmd.arg("--no-whois")
        .arg("--no-dns")
        .arg("--timeout=3")
        .env_remove("RUST_LOG")
        .env("NO_PROXY", "127.0.0.1")
        .env("no_proxy", "127.0.0.1");
    cmd
}

fn json_report(output: &std::process::Output) -> serde_json::Value {
    let stdout = str::from_utf8(&output.stdout).unwrap();
    serde_json::from_str(stdout).unwrap_or_else(|e| panic!("invalid JSON ({e}): {stdout}"))
}

/// An unreachable URL becomes an unreachable record, not a crash
#[test]
fn test_unreachable_url() {
    let output = offline_command()
        .arg(UNREACHABLE_URL)
        .arg("--format=json")
        .arg("--verbose=0")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let report = json_report(&output);
    let result = &report["results"][0];
    assert_eq!(result["url"], UNREACHABLE_URL);
    assert_eq!(result["verdict"], "unreachable");
    assert_eq!(result["fetch_failed"], true);
    assert_eq!(result["registrar"], "Unknown");
    assert_eq!(result["ip"], "Unresolved");
    assert_eq!(report["summary"]["unreachable"], 1);
}

/// A page full of gambling keywords is flagged
#[test]
fn test_gambling_page_is_suspicious() {
    let url = serve_html(GAMBLING_PAGE, 1);
    let output = offline_command()
        .arg(&url)
        .arg("--format=json")
        .arg("--verbose=0")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let report = json_report(&output);
    let result = &report["results"][0];
    assert_eq!(result["verdict"], "suspicious");
    assert_eq!(result["category"], "gambling");
    assert_eq!(result["verdict_label"], "Suspicious: Gambling");
    assert!(result["scores"]["gambling"].as_u64().unwrap() >= 4);
    assert_eq!(result["scores"]["prohibited"], 0);
    assert_eq!(result["domain"], "127.0.0.1");
}

/// URL list from a file keeps input order and skips blank lines
#[test]
fn test_url_file_input() {
    let news = serve_html(NEWS_PAGE, 1);
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{news}\n\n   \n{UNREACHABLE_URL}").unwrap();
    file.flush().unwrap();

    let output = offline_command()
        .arg("--file")
        .arg(file.path())
        .arg("--format=csv")
        .arg("--verbose=0")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = str::from_utf8(&output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "header + two rows: {stdout}");
    assert!(lines[0].starts_with("URL,Domain,Registrar,Country,IP"));
    assert!(lines[1].starts_with(&news));
    assert!(lines[1].contains(",Safe,Safe"));
    assert!(lines[2].starts_with(UNREACHABLE_URL));
    assert!(lines[2].contains("Could not retrieve"));
}

/// Progress lines go to stderr, the report to stdout
#[test]
fn test_progress_on_stderr() {
    let output = offline_command()
        .arg(UNREACHABLE_URL)
        .arg("--no-color")
        .arg("--verbose=1")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains(&format!("[1/1] {UNREACHABLE_URL} -> Could not retrieve")));
    let stdout = str::from_utf8(&output.stdout).unwrap();
    assert!(stdout.contains("Scan complete!"));
    assert!(!stdout.contains("[1/1]"));
}

/// HTML export written to --output
#[test]
fn test_html_report_to_file() {
    let url = serve_html(GAMBLING_PAGE, 1);
    let out = NamedTempFile::new().unwrap();

    let output = offline_command()
        .arg(&url)
        .arg(UNREACHABLE_URL)
        .arg("--format=html")
        .arg("--lang=vi")
        .arg("--verbose=0")
        .arg("--output")
        .arg(out.path())
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let html = std::fs::read_to_string(out.path()).unwrap();
    assert!(html.contains("#FF5252"));
    assert!(html.contains("Nghi ngờ: Cờ bạc / Cá cược"));
    assert!(html.contains("Không lấy được"));
}

/// No URLs at all is an error
#[test]
fn test_missing_urls() {
    let output = Command::new(get_binary_path())
        .arg("--verbose=0")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("No URLs to scan"));
}

/// URLs piped on stdin
#[test]
fn test_stdin_input() {
    let mut child = offline_command()
        .arg("--format=json")
        .arg("--verbose=0")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to execute binary");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(format!("{UNREACHABLE_URL}\n").as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let report = json_report(&output);
    assert_eq!(report["summary"]["total"], 1);
}

/// Test JSON schema generation
#[test]
fn test_generate_schema() {
    let output = Command::new(get_binary_path())
        .arg("--generate-schema")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let schema: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("schema is JSON");
    assert_eq!(schema["title"], "ScanReport");
}

/// Invalid configuration is rejected before scanning
#[test]
fn test_zero_timeout_rejected() {
    let output = Command::new(get_binary_path())
        .arg(UNREACHABLE_URL)
        .arg("--timeout=0")
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("network.fetch_timeout"));
}

/// Test help output
#[test]
fn test_help_output() {
    let output = Command::new(get_binary_path())
        .arg("--help")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = str::from_utf8(&output.stdout).unwrap();
    assert!(stdout.contains("--format"));
    assert!(stdout.contains("--no-whois"));
    assert!(stdout.contains("--lang"));
}
