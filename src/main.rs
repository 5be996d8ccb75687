use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use incore::{page_size, report, resident_pages};

/// Count pages of file contents resident in the page cache.
///
/// Prints one line per file: the number of resident pages, the file size in
/// bytes, and the name.
#[derive(Parser)]
#[command(
    name = "incore",
    version,
    about,
    after_help = "Example:\n\n    $ incore /etc/passwd\n    2          4194       /etc/passwd\n\n\
                  \"2\" is the number of resident pages and \"4194\" the file size in bytes.\n\
                  See the output of \"getconf PAGESIZE\" for the page size on your platform."
)]
struct Cli {
    /// Files to scan, in order.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut failed = false;
    let mut stdout = io::stdout().lock();

    for path in &cli.files {
        let line = match scan_file(path) {
            Ok((resident, size)) => report::count_line(path.display(), size, resident),
            Err(err) => {
                warn!(file = %path.display(), "{err:#}");
                failed = true;
                report::failure_line(path.display())
            }
        };

        if let Err(err) = writeln!(stdout, "{line}") {
            warn!("write error: {err}");
            failed = true;
            break;
        }
    }

    // Mirror the classic atexit(close_stdout) discipline: a report that never
    // reached the pipe is a failure, even if every scan succeeded.
    if let Err(err) = stdout.flush() {
        warn!("write error: {err}");
        failed = true;
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Opens and stats `path` once, then scans it. Returns the resident page
/// count and the stat'ed byte size.
fn scan_file(path: &Path) -> anyhow::Result<(u64, u64)> {
    let file = File::open(path).context("failed to open")?;
    let file_size = file.metadata().context("failed to stat")?.len();

    let resident = resident_pages(&file, file_size).with_context(|| {
        format!(
            "scan failed ({} bytes, {} byte pages)",
            file_size,
            page_size()
        )
    })?;

    Ok((resident, file_size))
}
