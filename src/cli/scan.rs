use crate::codec::Charset;
use crate::error::Result;
use crate::pipeline::{scan_lines, CancelFlag};
use crate::report::Report;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Scan a whole file on the calling thread, without work unit files
pub fn scan_file(input: &Path, charset: Charset) -> Result<Report> {
    let file = File::open(input)?;
    let batch = scan_lines(BufReader::new(file), 0, 1, charset, &CancelFlag::default())?;

    let mut report = Report::new(1);
    report.push_batch(batch);
    Ok(report)
}
