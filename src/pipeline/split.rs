use crate::error::{Result, XorsweepError};
use crate::pipeline::context::RunContext;
use crate::pipeline::worker::UnitTask;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// A contiguous run of input lines materialized in its own temp file
#[derive(Debug)]
pub struct WorkUnit {
    index: usize,
    first_line: usize,
    line_count: usize,
    byte_len: u64,
    file: NamedTempFile,
}

impl WorkUnit {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// 1-based input line number of the unit's first line
    pub fn first_line(&self) -> usize {
        self.first_line
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn byte_len(&self) -> u64 {
        self.byte_len
    }

    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }

    /// Borrow-free description of this unit for a worker thread
    pub fn task(&self) -> UnitTask {
        UnitTask {
            unit: self.index,
            path: self.path().to_path_buf(),
            first_line: self.first_line,
        }
    }
}

/// All work units of one run. Dropping the set deletes every unit file.
#[derive(Debug)]
pub struct SplitSet {
    source: PathBuf,
    units: Vec<WorkUnit>,
}

impl SplitSet {
    /// Split `input` into exactly `workers` units along line boundaries.
    ///
    /// Each unit but the last takes lines until it holds at least
    /// `file_size / workers` bytes; the last takes whatever remains.
    pub fn split(
        input: &Path,
        workers: usize,
        temp_dir: Option<&Path>,
        ctx: &RunContext,
    ) -> Result<Self> {
        if workers == 0 {
            return Err(XorsweepError::InvalidWorkerCount(workers));
        }
        let _entered = ctx.span().enter();

        let file = File::open(input).map_err(|e| XorsweepError::split_io(input, e))?;
        let total_bytes = file
            .metadata()
            .map_err(|e| XorsweepError::split_io(input, e))?
            .len();

        let dir = temp_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir);
        let stem = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "input".to_string());

        debug!(
            total_bytes,
            budget = total_bytes / workers as u64,
            "splitting {}",
            input.display()
        );

        let units = split_lines(BufReader::new(file), total_bytes, workers, |index| {
            tempfile::Builder::new()
                .prefix(&format!("{}.{}.", stem, index))
                .tempfile_in(&dir)
        })
        .map_err(|e| XorsweepError::split_io(input, e))?;

        Ok(Self {
            source: input.to_path_buf(),
            units,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn units(&self) -> &[WorkUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn total_lines(&self) -> usize {
        self.units.iter().map(WorkUnit::line_count).sum()
    }
}

impl Drop for SplitSet {
    fn drop(&mut self) {
        for unit in self.units.drain(..) {
            let path = unit.path().to_path_buf();
            match unit.file.close() {
                Ok(()) => debug!("removed work unit {}", path.display()),
                Err(e) => warn!(error = %e, "could not remove work unit {}", path.display()),
            }
        }
    }
}

/// Partition `reader` into `workers` units created by `create`.
///
/// On error the units created so far are dropped, which deletes their files.
pub fn split_lines<R, F>(
    mut reader: R,
    total_bytes: u64,
    workers: usize,
    mut create: F,
) -> io::Result<Vec<WorkUnit>>
where
    R: BufRead,
    F: FnMut(usize) -> io::Result<NamedTempFile>,
{
    let budget = total_bytes / workers.max(1) as u64;
    let mut units = Vec::with_capacity(workers);
    let mut line = Vec::new();
    let mut next_line = 1;

    for index in 0..workers {
        let mut file = create(index)?;
        let is_last = index + 1 == workers;
        let mut line_count = 0;
        let mut byte_len = 0u64;

        {
            let mut writer = BufWriter::new(file.as_file_mut());
            loop {
                line.clear();
                let n = reader.read_until(b'\n', &mut line)?;
                if n == 0 {
                    break;
                }
                writer.write_all(&line)?;
                line_count += 1;
                byte_len += n as u64;
                if !is_last && byte_len >= budget {
                    break;
                }
            }
            writer.flush()?;
        }

        debug!(
            unit = index,
            lines = line_count,
            bytes = byte_len,
            "created work unit {}",
            file.path().display()
        );

        units.push(WorkUnit {
            index,
            first_line: next_line,
            line_count,
            byte_len,
            file,
        });
        next_line += line_count;
    }

    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::{tempdir, TempDir};

    fn split_bytes(data: &[u8], workers: usize, dir: &TempDir) -> Vec<WorkUnit> {
        split_lines(Cursor::new(data), data.len() as u64, workers, |index| {
            tempfile::Builder::new()
                .prefix(&format!("unit.{}.", index))
                .tempfile_in(dir.path())
        })
        .unwrap()
    }

    fn joined(units: &[WorkUnit]) -> Vec<u8> {
        units
            .iter()
            .flat_map(|u| fs::read(u.path()).unwrap())
            .collect()
    }

    fn dir_entries(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_even_split() {
        let dir = tempdir().unwrap();
        let data = b"aaaa\nbbbb\ncccc\ndddd\n";
        let units = split_bytes(data, 2, &dir);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].line_count(), 2);
        assert_eq!(units[1].line_count(), 2);
        assert_eq!(units[1].first_line(), 3);
        assert_eq!(joined(&units), data);
    }

    #[test]
    fn test_last_unit_absorbs_remainder() {
        let dir = tempdir().unwrap();
        let data = b"aaaaaaaaa\nb\nb\nb\nb\nb\n";
        let units = split_bytes(data, 3, &dir);
        // budget = 20 / 3 = 6 bytes
        let counts: Vec<usize> = units.iter().map(WorkUnit::line_count).collect();
        assert_eq!(counts, vec![1, 3, 2]);
        assert_eq!(joined(&units), data);
    }

    #[test]
    fn test_more_workers_than_lines_leaves_trailing_empty_units() {
        let dir = tempdir().unwrap();
        let data = b"abcd\nef01\n";
        let units = split_bytes(data, 5, &dir);
        assert_eq!(units.len(), 5);
        assert_eq!(units[0].line_count(), 1);
        assert_eq!(units[1].line_count(), 1);
        assert!(units[2..].iter().all(WorkUnit::is_empty));
        assert!(units.iter().all(|u| u.path().exists()));
    }

    #[test]
    fn test_empty_input() {
        let dir = tempdir().unwrap();
        let units = split_bytes(b"", 3, &dir);
        assert_eq!(units.len(), 3);
        assert!(units.iter().all(WorkUnit::is_empty));
        assert!(units.iter().all(|u| u.first_line() == 1));
    }

    #[test]
    fn test_missing_trailing_newline_preserved() {
        let dir = tempdir().unwrap();
        let data = b"0102\n0304\n0506";
        let units = split_bytes(data, 2, &dir);
        assert_eq!(joined(&units), data);
        assert_eq!(units.iter().map(WorkUnit::line_count).sum::<usize>(), 3);
    }

    #[test]
    fn test_create_failure_removes_earlier_units() {
        let dir = tempdir().unwrap();
        let data = b"aa\nbb\ncc\ndd\n";
        let result = split_lines(Cursor::new(&data[..]), data.len() as u64, 4, |index| {
            if index == 2 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            tempfile::Builder::new().tempfile_in(dir.path())
        });
        assert!(result.is_err());
        assert_eq!(dir_entries(dir.path()), 0);
    }

    #[test]
    fn test_split_set_removes_files_on_drop() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("lines.txt");
        fs::write(&input, b"0a0b\n0c0d\n0e0f\n").unwrap();
        let scratch = tempdir().unwrap();

        let set = SplitSet::split(&input, 3, Some(scratch.path()), &RunContext::detached())
            .unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.total_lines(), 3);
        assert_eq!(dir_entries(scratch.path()), 3);
        let name = set.units()[1]
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert!(name.starts_with("lines.txt.1."));

        drop(set);
        assert_eq!(dir_entries(scratch.path()), 0);
    }

    #[test]
    fn test_split_missing_input_is_split_error() {
        let dir = tempdir().unwrap();
        let scratch = tempdir().unwrap();
        let err = SplitSet::split(
            &dir.path().join("absent.txt"),
            2,
            Some(scratch.path()),
            &RunContext::detached(),
        )
        .unwrap_err();
        assert!(matches!(err, XorsweepError::SplitIo { .. }));
        assert_eq!(dir_entries(scratch.path()), 0);
    }

    #[test]
    fn test_split_rejects_zero_workers() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("lines.txt");
        fs::write(&input, b"00\n").unwrap();
        assert!(matches!(
            SplitSet::split(&input, 0, None, &RunContext::detached()),
            Err(XorsweepError::InvalidWorkerCount(0))
        ));
    }

    proptest! {
        #[test]
        fn prop_partition_is_complete(
            lines in proptest::collection::vec("[0-9a-f]{0,40}", 0..40),
            workers in 1usize..9,
        ) {
            let dir = tempdir().unwrap();
            let data: Vec<u8> = lines.iter().flat_map(|l| format!("{}\n", l).into_bytes()).collect();
            let units = split_bytes(&data, workers, &dir);

            prop_assert_eq!(units.len(), workers);
            prop_assert_eq!(units.iter().map(WorkUnit::line_count).sum::<usize>(), lines.len());
            prop_assert_eq!(joined(&units), data);

            let mut expected_first = 1;
            for unit in &units {
                prop_assert_eq!(unit.first_line(), expected_first);
                expected_first += unit.line_count();
            }
        }
    }
}
