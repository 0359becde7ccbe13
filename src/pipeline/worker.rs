use crate::codec::{crack_line_with, trim_line_ending, Charset};
use crate::error::{Result, XorsweepError};
use crate::pipeline::context::CancelFlag;
use crate::report::{ResultBatch, ResultRecord, Source};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing::{info, warn};

/// One worker's assignment: a unit file and where its lines start in the input
#[derive(Debug, Clone)]
pub struct UnitTask {
    pub unit: usize,
    pub path: PathBuf,
    pub first_line: usize,
}

/// Brute-force every line of one unit file against all 256 keys
pub fn scan_unit(task: &UnitTask, charset: Charset, cancel: &CancelFlag) -> Result<ResultBatch> {
    let file = File::open(&task.path)?;
    let batch = scan_lines(
        BufReader::new(file),
        task.unit,
        task.first_line,
        charset,
        cancel,
    )?;

    info!(
        records = batch.records.len(),
        lines = batch.lines_scanned,
        skipped = batch.lines_skipped,
        "unit scanned"
    );
    Ok(batch)
}

/// Scan hex lines from any reader.
///
/// Lines that fail to decode are logged and skipped; blank lines are ignored.
/// Records come out in line order, then key order.
pub fn scan_lines<R: BufRead>(
    mut reader: R,
    unit: usize,
    first_line: usize,
    charset: Charset,
    cancel: &CancelFlag,
) -> Result<ResultBatch> {
    let mut batch = ResultBatch::new(unit);
    let mut buf = Vec::new();
    let mut line = first_line;

    loop {
        if cancel.is_cancelled() {
            return Err(XorsweepError::Cancelled);
        }

        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let current = line;
        line += 1;

        let text = match std::str::from_utf8(&buf) {
            Ok(text) => trim_line_ending(text),
            Err(_) => {
                warn!(line = current, "skipping line that is not UTF-8");
                batch.lines_skipped += 1;
                continue;
            }
        };
        // An empty decoding would pass the filter under every key
        if text.is_empty() {
            continue;
        }

        match crack_line_with(text, charset) {
            Ok(matches) => {
                batch.lines_scanned += 1;
                batch
                    .records
                    .extend(matches.into_iter().map(|m| ResultRecord {
                        source: Source { unit, line: current },
                        key: m.key,
                        ciphertext: text.to_string(),
                        plaintext: m.plaintext,
                    }));
            }
            Err(e) => {
                warn!(line = current, error = %e, "skipping malformed line");
                batch.lines_skipped += 1;
            }
        }
    }

    Ok(batch)
}
