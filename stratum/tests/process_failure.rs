//! Integration coverage for the checked command runner.

use std::process::Command;

use rstest::rstest;

use stratum::{ProcessError, checked_output};

#[rstest]
fn successful_commands_pass_output_through() {
    let output = match checked_output(Command::new("sh").args(["-c", "printf ok"])) {
        Ok(output) => output,
        Err(error) => panic!("expected success: {error}"),
    };
    assert_eq!(output.stdout, b"ok".to_vec());
}

#[rstest]
fn failing_commands_surface_status_and_streams() {
    let result = checked_output(
        Command::new("sh").args(["-c", "echo partial; echo broken >&2; exit 3"]),
    );
    let error = match result {
        Ok(_) => panic!("expected the command to fail"),
        Err(error) => error,
    };
    match error {
        ProcessError::Failed(failure) => {
            assert_eq!(failure.code(), Some(3));
            assert_eq!(failure.program(), "sh");
            let stderr = String::from_utf8_lossy(failure.stderr());
            assert!(stderr.contains("broken"), "stderr should be captured: {stderr}");
            let rendered = failure.to_string();
            assert!(rendered.contains("exited with status 3"), "{rendered}");
            assert!(rendered.contains("partial"), "stdout tail should render: {rendered}");
        }
        other => panic!("expected a failure report, got {other}"),
    }
}

#[rstest]
fn unlaunchable_commands_report_spawn_failures() {
    let error = match checked_output(&mut Command::new("stratum-no-such-binary")) {
        Ok(_) => panic!("expected the spawn to fail"),
        Err(error) => error,
    };
    match error {
        ProcessError::Spawn { program, .. } => assert_eq!(program, "stratum-no-such-binary"),
        other => panic!("expected a spawn failure, got {other}"),
    }
}
