use crate::config::{CORE_FIELD, FIELD_COUNT, HEADER_MARKER, IDLE_FIELD};
use crate::error::{ReportError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// One measurement interval for one core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub core: i64,
    pub idle_pct: f64,
}

impl Sample {
    /// Parse a single log line.
    ///
    /// Returns `Ok(None)` for header/noise lines (anything containing `CPU`).
    /// Every other line must be a data line with exactly 8 fields.
    pub fn parse(line: &str, line_no: usize) -> Result<Option<Self>> {
        if line.contains(HEADER_MARKER) {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != FIELD_COUNT {
            return Err(ReportError::FieldCount {
                line: line_no,
                found: fields.len(),
            });
        }

        let core = fields[CORE_FIELD]
            .parse::<i64>()
            .map_err(|_| ReportError::InvalidCoreId {
                line: line_no,
                value: fields[CORE_FIELD].to_string(),
            })?;
        let idle_pct = fields[IDLE_FIELD]
            .parse::<f64>()
            .map_err(|_| ReportError::InvalidIdle {
                line: line_no,
                value: fields[IDLE_FIELD].to_string(),
            })?;

        Ok(Some(Sample { core, idle_pct }))
    }

    pub fn utilization(&self) -> f64 {
        100.0 - self.idle_pct
    }
}

/// Lazy sequence of samples read from a log, header lines skipped.
pub struct SampleReader<R> {
    lines: Lines<R>,
    path: PathBuf,
    line_no: usize,
}

impl SampleReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| ReportError::Open {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "opened sampling log");
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> SampleReader<R> {
    /// Wrap an already-open reader. `path` is only used in error messages.
    pub fn new(reader: R, path: PathBuf) -> Self {
        Self {
            lines: reader.lines(),
            path,
            line_no: 0,
        }
    }

    /// Number of lines consumed so far, headers included.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for SampleReader<R> {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(source) => {
                    return Some(Err(ReportError::Read {
                        path: self.path.clone(),
                        source,
                    }))
                }
            };
            self.line_no += 1;

            match Sample::parse(&line, self.line_no) {
                Ok(Some(sample)) => return Some(Ok(sample)),
                Ok(None) => trace!(line = self.line_no, "skipping header line"),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(input: &str) -> SampleReader<Cursor<&str>> {
        SampleReader::new(Cursor::new(input), PathBuf::from("test.log"))
    }

    #[test]
    fn parses_core_and_idle_fields() {
        let sample = Sample::parse("12:00:01 3 1.00 0.00 2.00 0.00 0.00 97.00", 1)
            .unwrap()
            .unwrap();
        assert_eq!(sample.core, 3);
        assert_eq!(sample.idle_pct, 97.0);
        assert_eq!(sample.utilization(), 3.0);
    }

    #[test]
    fn header_lines_are_skipped() {
        let line = "12:00:00 CPU %usr %nice %sys %iowait %irq %idle";
        assert_eq!(Sample::parse(line, 1).unwrap(), None);
        // Header detection does not care about the field count.
        assert_eq!(Sample::parse("Linux 5.15 (host) CPU", 1).unwrap(), None);
    }

    #[test]
    fn marker_is_case_sensitive() {
        let err = Sample::parse("cpu 0 a b c d e", 4).unwrap_err();
        assert!(matches!(err, ReportError::FieldCount { line: 4, found: 7 }));
    }

    #[test]
    fn wrong_field_count_is_an_error() {
        let err = Sample::parse("Linux 0 12:00:00 0 1 2 90.00", 7).unwrap_err();
        assert!(matches!(err, ReportError::FieldCount { line: 7, found: 7 }));

        let err = Sample::parse("Linux 0 12:00:00 0 1 2 3 4 90.00", 2).unwrap_err();
        assert!(matches!(err, ReportError::FieldCount { line: 2, found: 9 }));
    }

    #[test]
    fn blank_line_is_an_error() {
        let err = Sample::parse("", 5).unwrap_err();
        assert!(matches!(err, ReportError::FieldCount { line: 5, found: 0 }));
    }

    #[test]
    fn non_numeric_fields_are_errors() {
        let err = Sample::parse("Linux all 12:00:00 0 1 2 3 90.00", 1).unwrap_err();
        assert!(matches!(err, ReportError::InvalidCoreId { ref value, .. } if value == "all"));

        let err = Sample::parse("Linux 0 12:00:00 0 1 2 3 idle", 1).unwrap_err();
        assert!(matches!(err, ReportError::InvalidIdle { ref value, .. } if value == "idle"));

        let err = Sample::parse("Linux 1.5 12:00:00 0 1 2 3 90.00", 1).unwrap_err();
        assert!(matches!(err, ReportError::InvalidCoreId { .. }));
    }

    #[test]
    fn tabs_and_runs_of_spaces_separate_fields() {
        let sample = Sample::parse("  Linux\t2   a b c d e\t\t55.5  ", 1)
            .unwrap()
            .unwrap();
        assert_eq!(sample, Sample { core: 2, idle_pct: 55.5 });
    }

    #[test]
    fn reader_yields_data_lines_only() {
        let input = "CPU header\n\
                     Linux 0 t 0 1 2 3 90.00\n\
                     CPU again\n\
                     Linux 1 t 0 1 2 3 70.00\n";
        let mut samples = reader(input);
        let collected: Vec<Sample> = samples.by_ref().map(|s| s.unwrap()).collect();
        assert_eq!(
            collected,
            vec![
                Sample { core: 0, idle_pct: 90.0 },
                Sample { core: 1, idle_pct: 70.0 },
            ]
        );
        assert_eq!(samples.lines_read(), 4);
    }

    #[test]
    fn reader_reports_line_numbers_of_bad_lines() {
        let input = "CPU header\nLinux 0 t 0 1 2 3 90.00\nLinux 0 t 0 1 2 80.00\n";
        let results: Vec<_> = reader(input).collect();
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(ReportError::FieldCount { line: 3, found: 7 })
        ));
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let input = "Linux 0 t 0 1 2 3 90.00\r\n";
        let samples: Vec<_> = reader(input).map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![Sample { core: 0, idle_pct: 90.0 }]);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = SampleReader::open("/definitely/not/here.log").err().unwrap();
        assert!(matches!(err, ReportError::Open { .. }));
        assert!(err.to_string().contains("/definitely/not/here.log"));
    }
}
