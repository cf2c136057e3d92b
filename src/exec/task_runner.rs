// src/exec/task_runner.rs

//! Individual command runner.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::dag::WorkItem;
use crate::engine::OutcomeRecord;
use crate::output::{OutputPrinter, OutputSink};
use crate::types::OutputStream;

/// A fully resolved command: where to run it and what to run.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub cwd: PathBuf,
    /// Executable followed by its arguments. Never empty for a validated
    /// config.
    pub argv: Vec<String>,
}

/// Run the command for `item`, streaming every output line to the
/// printer's sink for the project while also capturing it.
///
/// Never fails: a command that cannot be spawned yields exit code `-1`
/// with the error in stderr.
pub async fn run_command(
    item: &WorkItem,
    spec: CommandSpec,
    printer: &dyn OutputPrinter,
) -> OutcomeRecord {
    let mut record = OutcomeRecord::for_item(item);
    record.cwd = Some(spec.cwd.clone());
    record.command = spec.argv.clone();

    let Some((program, args)) = spec.argv.split_first() else {
        record.exit_code = Some(-1);
        record.stderr = format!("empty command for project '{}'", item.project);
        return record;
    };

    info!(
        project = %item.project,
        group = %item.group,
        cwd = %spec.cwd.display(),
        cmd = ?spec.argv,
        "starting command"
    );

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(&spec.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            warn!(project = %item.project, error = %err, "failed to spawn command");
            record.exit_code = Some(-1);
            record.stderr = format!(
                "failed to spawn {:?} in {}: {err}",
                program,
                spec.cwd.display()
            );
            return record;
        }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (out, err, status) = tokio::join!(
        pump(stdout, printer.sink_for(&item.project), OutputStream::Stdout),
        pump(stderr, printer.sink_for(&item.project), OutputStream::Stderr),
        child.wait(),
    );

    record.stdout = out;
    record.stderr = err;

    match status {
        Ok(status) => {
            record.exit_code = status.code();
            record.signal = exit_signal(&status);
            info!(
                project = %item.project,
                exit_code = ?record.exit_code,
                signal = ?record.signal,
                success = status.success(),
                "command exited"
            );
        }
        Err(e) => {
            warn!(project = %item.project, error = %e, "waiting for command failed");
            record.exit_code = Some(-1);
            if !record.stderr.is_empty() && !record.stderr.ends_with('\n') {
                record.stderr.push('\n');
            }
            record.stderr.push_str(&format!("waiting for command failed: {e}"));
        }
    }

    record
}

/// Forward each line of `reader` to `sink`, returning everything read.
///
/// Bytes that are not valid UTF-8 are replaced rather than ending the
/// read. The pipe is always drained to EOF so the child never sees a
/// closed stdout or stderr.
async fn pump<R>(reader: Option<R>, mut sink: Box<dyn OutputSink>, stream: OutputStream) -> String
where
    R: AsyncRead + Unpin,
{
    let mut captured = String::new();
    let Some(reader) = reader else {
        return captured;
    };

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let chunk = String::from_utf8_lossy(&buf);
                let line = chunk.strip_suffix('\n').unwrap_or(&chunk);
                let line = line.strip_suffix('\r').unwrap_or(line);
                sink.write_line(stream, line);
                captured.push_str(line);
                captured.push('\n');
            }
            Err(e) => {
                warn!(?stream, error = %e, "reading command output failed; discarding the rest");
                if let Err(e) = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await {
                    debug!(?stream, error = %e, "stopped draining command output");
                }
                break;
            }
        }
    }
    captured
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
