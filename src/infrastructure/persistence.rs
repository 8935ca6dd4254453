//! Submission sinks for completed recipient records.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::domain::{DomainResult, FormData};

/// Receives the completed form once step 2 validates.
pub trait SubmissionSink {
    /// Stores or forwards `data`, returning a short description of where it went.
    fn submit(&mut self, data: &FormData) -> DomainResult<String>;
}

/// Writes the submission to the log and nowhere else.
#[derive(Debug, Default)]
pub struct LogSink;

impl SubmissionSink for LogSink {
    fn submit(&mut self, data: &FormData) -> DomainResult<String> {
        info!(
            "form submitted: bank={} account_number={} account_name={} email={} phone={} {}",
            data.bank, data.account_number, data.account_name, data.email, data.country_code, data.phone_number
        );
        Ok("log".to_string())
    }
}

/// Appends one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load_all(path: &Path) -> DomainResult<Vec<FormData>> {
        let content = fs::read_to_string(path)?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str::<FormData>(line).map_err(Into::into))
            .collect()
    }
}

impl SubmissionSink for JsonLinesSink {
    fn submit(&mut self, data: &FormData) -> DomainResult<String> {
        let line = serde_json::to_string(data)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{line}")?;
        info!("form submission appended to {}", self.path.display());
        Ok(self.path.display().to_string())
    }
}

/// Appends one CSV row per submission. The header goes in only when the file is new or empty.
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load_all(path: &Path) -> DomainResult<Vec<FormData>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        for record in reader.deserialize::<FormData>() {
            records.push(record?);
        }
        Ok(records)
    }
}

impl SubmissionSink for CsvSink {
    fn submit(&mut self, data: &FormData) -> DomainResult<String> {
        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(needs_header).from_writer(file);
        writer.serialize(data)?;
        writer.flush()?;
        info!("form submission appended to {}", self.path.display());
        Ok(self.path.display().to_string())
    }
}

/// Picks a sink from the file extension: `.csv` gets CSV, anything else JSON lines.
/// With no path, submissions only go to the log.
pub fn sink_for_path(path: Option<&Path>) -> Box<dyn SubmissionSink> {
    match path {
        None => Box::new(LogSink),
        Some(path) if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) => {
            Box::new(CsvSink::new(path))
        }
        Some(path) => Box::new(JsonLinesSink::new(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(email: &str) -> FormData {
        FormData {
            bank: "GTBank".to_string(),
            account_number: "1234567890".to_string(),
            account_name: "ODUTUGA GBEKE".to_string(),
            email: email.to_string(),
            country_code: "+234".to_string(),
            phone_number: "08012345678".to_string(),
        }
    }

    #[test]
    fn test_log_sink() {
        let mut sink = LogSink;
        assert_eq!(sink.submit(&sample("a@b.com")).unwrap(), "log");
    }

    #[test]
    fn test_json_lines_sink_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recipients.jsonl");
        let mut sink = JsonLinesSink::new(&path);

        sink.submit(&sample("a@b.com")).unwrap();
        sink.submit(&sample("c@d.com")).unwrap();

        let records = JsonLinesSink::load_all(&path).unwrap();
        assert_eq!(records, vec![sample("a@b.com"), sample("c@d.com")]);
    }

    #[test]
    fn test_csv_sink_writes_header_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recipients.csv");
        let mut sink = CsvSink::new(&path);

        sink.submit(&sample("a@b.com")).unwrap();
        sink.submit(&sample("c@d.com")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("account_number").count(), 1);

        let records = CsvSink::load_all(&path).unwrap();
        assert_eq!(records, vec![sample("a@b.com"), sample("c@d.com")]);
    }

    #[test]
    fn test_json_sink_reports_unwritable_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("recipients.jsonl");
        let mut sink = JsonLinesSink::new(&path);

        assert!(sink.submit(&sample("a@b.com")).is_err());
    }

    #[test]
    fn test_sink_for_path() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("out.CSV");

        let mut sink = sink_for_path(Some(csv_path.as_path()));
        sink.submit(&sample("a@b.com")).unwrap();

        assert_eq!(CsvSink::load_all(&csv_path).unwrap().len(), 1);
        assert_eq!(sink_for_path(None).submit(&sample("a@b.com")).unwrap(), "log");
    }
}
