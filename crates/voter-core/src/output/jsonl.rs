//! JSONL Sink
//!
//! Append-only JSON lines file; one tagged record per line.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;
use voter_events::{AgentRecord, OutputRecord, SimulationRecord, StepRecord};

use super::PersistenceSink;
use crate::error::PersistenceError;

pub struct JsonlSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    records_written: u64,
}

impl JsonlSink {
    /// Opens `path` for appending, creating it and its parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            records_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records written since the sink was opened
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    fn write(&mut self, record: &OutputRecord) -> Result<(), PersistenceError> {
        let writer = self.writer.as_mut().ok_or(PersistenceError::Closed)?;
        let line = record.to_jsonl()?;
        writeln!(writer, "{}", line)?;
        self.records_written += 1;
        Ok(())
    }
}

impl PersistenceSink for JsonlSink {
    fn insert_simulation_record(
        &mut self,
        record: &SimulationRecord,
    ) -> Result<(), PersistenceError> {
        self.write(&OutputRecord::Simulation(record.clone()))
    }

    fn insert_step_record(&mut self, record: &StepRecord) -> Result<(), PersistenceError> {
        self.write(&OutputRecord::Step(record.clone()))
    }

    fn insert_agent_record(&mut self, record: &AgentRecord) -> Result<(), PersistenceError> {
        self.write(&OutputRecord::Agent(record.clone()))
    }

    fn checkpoint(&mut self) -> Result<(), PersistenceError> {
        let writer = self.writer.as_mut().ok_or(PersistenceError::Closed)?;
        writer.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), PersistenceError> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for JsonlSink {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to flush {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};

    fn step(step: u64) -> StepRecord {
        StepRecord {
            experiment_id: "exp".into(),
            ensemble_id: 2,
            step,
            total_yes: 3,
            total_no: 1,
            avg_influence: 0.25,
        }
    }

    fn read_lines(path: &Path) -> Vec<String> {
        let file = File::open(path).unwrap();
        BufReader::new(file).lines().map(|l| l.unwrap()).collect()
    }

    #[test]
    fn test_records_written_as_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/run.jsonl");

        let mut sink = JsonlSink::open(&path).unwrap();
        sink.insert_step_record(&step(0)).unwrap();
        sink.insert_step_record(&step(1)).unwrap();
        sink.checkpoint().unwrap();
        assert_eq!(sink.records_written(), 2);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        match OutputRecord::from_jsonl(&lines[1]).unwrap() {
            OutputRecord::Step(record) => assert_eq!(record, step(1)),
            other => panic!("expected step record, got {:?}", other),
        }
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.jsonl");

        {
            let mut sink = JsonlSink::open(&path).unwrap();
            sink.insert_step_record(&step(0)).unwrap();
            sink.close().unwrap();
        }
        {
            let mut sink = JsonlSink::open(&path).unwrap();
            sink.insert_step_record(&step(1)).unwrap();
        }

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_closed_sink_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonlSink::open(dir.path().join("run.jsonl")).unwrap();
        sink.close().unwrap();

        assert!(matches!(
            sink.insert_step_record(&step(0)),
            Err(PersistenceError::Closed)
        ));
        assert!(matches!(sink.checkpoint(), Err(PersistenceError::Closed)));
        // Closing twice is harmless
        assert!(sink.close().is_ok());
    }
}
