use loadramp::TargetStreamCursor;
use loadramp_core::{RampConfig, Rate};
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("loadramp=debug,loadramp_runtime=debug"))
            .with_test_writer()
            .init();
    });
}

/// Two rates, two buckets, driven by the mock tool with no settle time.
#[allow(unused)]
pub fn mock_config(dir: &Path) -> RampConfig {
    RampConfig::default()
        .tool(env!("CARGO_BIN_EXE_mock-vegeta"))
        .work_dir(dir)
        .attack_duration(Duration::from_secs(1))
        .settle_interval(Duration::ZERO)
        .rates(vec![Rate::new(1.), Rate::new(2.)])
        .buckets(vec![Duration::ZERO, Duration::from_nanos(1000)])
}

#[allow(unused)]
pub fn target(latency_ns: u64, ok: bool) -> String {
    format!(
        r#"{{"method": "GET", "url": "http://localhost/", "latency_ns": {latency_ns}, "ok": {ok}}}"#
    )
}

#[allow(unused)]
pub fn targets(lines: &[String]) -> TargetStreamCursor<File> {
    let mut file = tempfile::tempfile().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.seek(SeekFrom::Start(0)).unwrap();
    TargetStreamCursor::new(file)
}

/// Targets arriving through an OS pipe, as they do when the binary is fed by a shell pipeline.
///
/// The lines are written from a separate thread through `cat`, whose stdout becomes the cursor.
/// Wait on the returned child once the ramp is done.
#[cfg(unix)]
#[allow(unused)]
pub fn piped_targets(lines: &[String]) -> (TargetStreamCursor<File>, std::process::Child) {
    use std::os::fd::OwnedFd;
    use std::process::{Command, Stdio};

    let mut cat = Command::new("cat")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    let read_end = File::from(OwnedFd::from(cat.stdout.take().unwrap()));

    let mut write_end = cat.stdin.take().unwrap();
    let lines = lines.to_vec();
    std::thread::spawn(move || {
        for line in lines {
            writeln!(write_end, "{line}").unwrap();
        }
    });

    (TargetStreamCursor::new(read_end), cat)
}

#[allow(unused)]
pub fn datasets(dir: &Path) -> (String, String) {
    (
        std::fs::read_to_string(dir.join("results_latency.txt")).unwrap(),
        std::fs::read_to_string(dir.join("results_success.txt")).unwrap(),
    )
}
