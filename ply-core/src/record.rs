//! Types and traits for reporting episode and session results.
//!
//! The [`Session`](crate::Session) does not print anything by itself. At the
//! end of every completed episode, and once at the end of the session, it
//! builds a [`Record`] and hands it to a [`Recorder`]. What happens to the
//! record, printing to a console or buffering for a test, is up to the
//! recorder.
//!
//! # Core Components
//!
//! * [`Record`] - A container for key-value pairs of various data types
//! * [`RecordValue`] - The types of values that can be stored
//! * [`Recorder`] - Receives records
//! * [`BufferedRecorder`] - Keeps records in memory
//! * [`NullRecorder`] - Discards all records
//!
//! # Basic Usage
//!
//! ```rust
//! use ply_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("steps", RecordValue::Count(120));
//! record.insert("sps", RecordValue::Scalar(3520.5));
//! assert_eq!(record.get_count("steps").unwrap(), 120);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
