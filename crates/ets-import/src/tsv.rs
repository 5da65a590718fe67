//! Tab-separated row reading.
//!
//! Source extracts are UTF-8, one header line, tab-delimited with positional
//! columns; empty fields are preserved. The registry data ships
//! tab-separated under a `.csv` extension, so folder enumeration accepts
//! both `.csv` and `.tsv`.

use crate::report::StageReport;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One data row: 1-based line number and trimmed positional fields.
#[derive(Debug, Clone)]
pub struct Row {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Iterator over the data rows of one file. The header line is consumed on
/// open; blank lines are skipped.
pub struct RowReader {
    lines: io::Lines<BufReader<File>>,
    line_no: usize,
}

impl RowReader {
    pub fn open(path: &Path) -> io::Result<RowReader> {
        let file = File::open(path)?;
        let mut lines = BufReader::new(file).lines();
        lines.next().transpose()?; // header
        Ok(RowReader { lines, line_no: 1 })
    }
}

impl Iterator for RowReader {
    type Item = io::Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let fields = line.split('\t').map(|f| f.trim().to_string()).collect();
            return Some(Ok(Row {
                line: self.line_no,
                fields,
            }));
        }
    }
}

/// Enumerate the data files of a source folder, sorted by name. A path that
/// is not a directory is recorded on the report and yields nothing.
pub fn data_files(folder: &Path, report: &mut StageReport) -> Vec<PathBuf> {
    if !folder.is_dir() {
        tracing::warn!("{} is not a directory, skipping", folder.display());
        report.skip_file(folder, "not a directory");
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("tsv"))
        })
        .collect();
    files.sort();
    files
}
