use super::Record;

/// Receives the records emitted by a [`Session`](crate::Session).
pub trait Recorder {
    /// Write a record to the [`Recorder`].
    fn write(&mut self, record: Record);
}

impl<R: Recorder + ?Sized> Recorder for Box<R> {
    fn write(&mut self, record: Record) {
        (**self).write(record)
    }
}
