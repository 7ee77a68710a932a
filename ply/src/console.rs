//! Prints session records as report lines.
use log::warn;
use ply_core::record::{Record, Recorder};
use std::io::{self, Write};

/// Writes episode and summary records to a terminal.
pub struct ConsoleRecorder<W> {
    out: W,
}

impl<W: Write> ConsoleRecorder<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn episode(&mut self, record: &Record) -> anyhow::Result<()> {
        writeln!(
            self.out,
            "Episode: {}. Steps: {}. SPS: {:.2}",
            record.get_count("episode")?,
            record.get_count("steps")?,
            record.get_scalar("sps")?
        )?;
        if let Ok(reward) = record.get_scalar("final_reward") {
            writeln!(self.out, "Final reward: {}", reward)?;
        }
        if let Ok(end_status) = record.get_string("end_status") {
            writeln!(self.out, "End status: {}", end_status)?;
        }
        if let Ok(reward) = record.get_scalar("mean_reward") {
            writeln!(self.out, "Mean reward: {}", reward)?;
        }
        Ok(())
    }

    fn summary(&mut self, record: &Record) -> anyhow::Result<()> {
        writeln!(
            self.out,
            "Finished after {} episodes and {:.2} seconds. Mean sps: {:.2}",
            record.get_count("episodes")?,
            record.get_scalar("elapsed")?,
            record.get_scalar("mean_sps")?
        )?;
        Ok(())
    }
}

impl Default for ConsoleRecorder<io::Stdout> {
    fn default() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Recorder for ConsoleRecorder<W> {
    fn write(&mut self, record: Record) {
        let written = match record.get_string("event").as_deref() {
            Ok("episode") => self.episode(&record),
            Ok("summary") => self.summary(&record),
            _ => Ok(()),
        };
        let flushed = written.and_then(|_| Ok(self.out.flush()?));
        if let Err(e) = flushed {
            warn!("Failed to print a record: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ply_core::record::RecordValue;

    fn print(record: Record) -> String {
        let mut recorder = ConsoleRecorder::new(Vec::new());
        recorder.write(record);
        String::from_utf8(recorder.out).unwrap()
    }

    #[test]
    fn test_minimal_episode() {
        let record = Record::from_slice(&[
            ("event", RecordValue::String("episode".to_string())),
            ("episode", RecordValue::Count(0)),
            ("steps", RecordValue::Count(5)),
            ("sps", RecordValue::Scalar(1234.5678)),
        ]);
        assert_eq!(print(record), "Episode: 0. Steps: 5. SPS: 1234.57\n");
    }

    #[test]
    fn test_rich_episode() {
        let record = Record::from_slice(&[
            ("event", RecordValue::String("episode".to_string())),
            ("episode", RecordValue::Count(2)),
            ("steps", RecordValue::Count(3)),
            ("sps", RecordValue::Scalar(10.0)),
            ("final_reward", RecordValue::Scalar(3.0)),
            ("end_status", RecordValue::String("TASK_SUCCESSFUL".to_string())),
            ("mean_reward", RecordValue::Scalar(2.0)),
        ]);
        assert_eq!(
            print(record),
            "Episode: 2. Steps: 3. SPS: 10.00\n\
             Final reward: 3\n\
             End status: TASK_SUCCESSFUL\n\
             Mean reward: 2\n"
        );
    }

    #[test]
    fn test_summary() {
        let record = Record::from_slice(&[
            ("event", RecordValue::String("summary".to_string())),
            ("episodes", RecordValue::Count(4)),
            ("elapsed", RecordValue::Scalar(1.5)),
            ("mean_sps", RecordValue::Scalar(99.0)),
        ]);
        assert_eq!(
            print(record),
            "Finished after 4 episodes and 1.50 seconds. Mean sps: 99.00\n"
        );
    }

    #[test]
    fn test_other_records_are_ignored() {
        assert_eq!(print(Record::from_scalar("loss", 0.5)), "");
    }
}
