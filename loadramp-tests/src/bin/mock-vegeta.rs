//! Stand-in for `vegeta` with just enough of `attack` and `report` for the ramp.
//!
//! Targets are JSON lines carrying the outcome the mock should pretend to observe:
//! `{"latency_ns": 1500, "ok": true}`. `attack` reads `rate * duration` of them from stdin, then a
//! few bytes of the next one, as a tool stopped mid-read would, and stores the complete ones as the
//! artifact. `report` buckets the stored outcomes.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::process::ExitCode;

const PARTIAL_BYTES: usize = 3;

#[derive(Debug, Deserialize)]
struct Outcome {
    latency_ns: u64,
    ok: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    requests: u64,
    success: f64,
    buckets: BTreeMap<String, u64>,
    errors: Vec<String>,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("attack") => attack(&args[1..]),
        Some("report") => report(&args[1..]),
        _ => Err(format!("unsupported invocation {args:?}")),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mock-vegeta: {err}");
            ExitCode::FAILURE
        }
    }
}

fn flag<'a>(args: &'a [String], name: &str) -> Result<&'a str, String> {
    args.iter()
        .find_map(|arg| arg.strip_prefix(name)?.strip_prefix('='))
        .ok_or_else(|| format!("missing {name}"))
}

fn seconds(value: &str) -> Result<f64, String> {
    value
        .strip_suffix('s')
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| format!("bad duration {value}"))
}

fn attack(args: &[String]) -> Result<(), String> {
    if !args.iter().any(|arg| arg == "-lazy") {
        return Err("expected -lazy".into());
    }
    let (count, window) = flag(args, "-rate")?
        .split_once('/')
        .ok_or("bad rate")?;
    let count: f64 = count.parse().map_err(|_| format!("bad rate {count}"))?;
    let per_second = count / seconds(window)?;
    let lines = (per_second * seconds(flag(args, "-duration")?)?).round() as usize;
    let output = flag(args, "-output")?;

    let mut stdin = unbuffered_stdin().map_err(|e| e.to_string())?;
    let mut artifact = String::new();
    for _ in 0..lines {
        let line = read_line(&mut stdin).map_err(|e| e.to_string())?;
        if line.ends_with('\n') {
            artifact.push_str(&line);
        }
    }
    let mut partial = [0u8; PARTIAL_BYTES];
    let _ = stdin.read(&mut partial).map_err(|e| e.to_string())?;

    std::fs::write(output, artifact).map_err(|e| e.to_string())
}

fn report(args: &[String]) -> Result<(), String> {
    if flag(args, "-type")? != "json" {
        return Err("expected -type=json".into());
    }
    let boundaries = flag(args, "-buckets")?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|b| {
            b.strip_suffix("ns")
                .and_then(|n| n.parse::<u64>().ok())
                .ok_or_else(|| format!("bad bucket {b}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let path = args.last().ok_or("missing artifact")?;

    let artifact = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    let outcomes = artifact
        .lines()
        .map(|line| serde_json::from_str::<Outcome>(line).map_err(|e| format!("{path}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    let mut buckets: BTreeMap<String, u64> =
        boundaries.iter().map(|b| (b.to_string(), 0)).collect();
    for outcome in &outcomes {
        if let Some(b) = boundaries.iter().rev().find(|&&b| b <= outcome.latency_ns) {
            *buckets.entry(b.to_string()).or_default() += 1;
        }
    }

    let requests = outcomes.len() as u64;
    let ok = outcomes.iter().filter(|o| o.ok).count() as u64;
    let report = Report {
        requests,
        success: if requests == 0 {
            0.
        } else {
            ok as f64 / requests as f64
        },
        buckets,
        errors: if ok < requests {
            vec!["500 Internal Server Error".into()]
        } else {
            vec![]
        },
    };
    println!("{}", serde_json::to_string(&report).map_err(|e| e.to_string())?);
    Ok(())
}

/// Reads a byte at a time so nothing past the line is taken from the shared stream.
fn read_line(stdin: &mut File) -> io::Result<String> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    while stdin.read(&mut byte)? == 1 {
        line.push(byte[0]);
        if byte[0] == b'\n' {
            break;
        }
    }
    Ok(String::from_utf8_lossy(&line).into_owned())
}

#[cfg(unix)]
fn unbuffered_stdin() -> io::Result<File> {
    use std::os::fd::AsFd;
    Ok(File::from(io::stdin().as_fd().try_clone_to_owned()?))
}

#[cfg(windows)]
fn unbuffered_stdin() -> io::Result<File> {
    use std::os::windows::io::AsHandle;
    Ok(File::from(io::stdin().as_handle().try_clone_to_owned()?))
}
