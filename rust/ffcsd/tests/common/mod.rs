#![allow(dead_code)]

use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

pub fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_ffcsd");
    let mut child = Command::new(exe)
        .env_remove("FFCSD_CONFIG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn ffcsd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

pub fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

pub fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_default()
}

pub fn request_err(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "{} unexpectedly succeeded: {}",
        method,
        value
    );
    value.get("error").cloned().unwrap_or_default()
}

pub fn error_code(error: &serde_json::Value) -> &str {
    error.get("code").and_then(|v| v.as_str()).unwrap_or("")
}

pub fn sample_courses() -> serde_json::Value {
    json!([
        {
            "code": "CSE3001",
            "name": "Data Structures and Algorithms",
            "credits": 4,
            "faculty": "Dr. Priya Sharma",
            "slot": "A1+TA1",
            "venue": "MB-301",
            "enrolled": 58,
            "capacity": 60,
            "category": "Core"
        },
        {
            "code": "CSE3002",
            "name": "Database Management Systems",
            "credits": 3,
            "faculty": "Prof. Rajesh Kumar",
            "slot": "B1+TB1",
            "venue": "MB-302",
            "enrolled": 55,
            "capacity": 60,
            "category": "Core"
        },
        {
            "code": "CSE3099",
            "name": "Compiler Design",
            "credits": 4,
            "faculty": "Dr. Anjali Menon",
            "slot": "A1+TA1",
            "venue": "MB-303",
            "enrolled": 10,
            "capacity": 60,
            "category": "Core"
        },
        {
            "code": "CSE4001",
            "name": "Machine Learning",
            "credits": 3,
            "faculty": "Dr. Vikram Singh",
            "slot": "D1+TD1",
            "venue": "SJT-401",
            "enrolled": 45,
            "capacity": 50,
            "category": "Elective"
        },
        {
            "code": "CAP9000",
            "name": "Capstone Project",
            "credits": 25,
            "faculty": "Prof. Arun Mehta",
            "slot": "F1+TF1",
            "venue": "SJT-403",
            "enrolled": 0,
            "capacity": 20,
            "category": "Elective"
        }
    ])
}

/// Selects a fresh workspace and loads the sample catalog through a dean session.
pub fn seeded_sidecar(prefix: &str) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let workspace = temp_dir(prefix);
    let (child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "ws",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let dean = request_ok(
        &mut stdin,
        &mut reader,
        "dean",
        "session.open",
        json!({ "userId": "DEAN001", "role": "dean" }),
    );
    let dean_id = dean["sessionId"].as_str().expect("dean sessionId").to_string();
    let imported = request_ok(
        &mut stdin,
        &mut reader,
        "import",
        "catalog.import",
        json!({ "sessionId": dean_id, "courses": sample_courses() }),
    );
    assert_eq!(imported["imported"].as_u64(), Some(5));
    (child, stdin, reader)
}

pub fn open_student(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>, user: &str) -> String {
    let opened = request_ok(
        stdin,
        reader,
        &format!("open-{}", user),
        "session.open",
        json!({ "userId": user, "role": "student" }),
    );
    opened["sessionId"].as_str().expect("sessionId").to_string()
}
