use crate::envelope::ResultEnvelope;
use crate::error::EventsError;
use std::io::Write;

/// Consumer of a finished run's envelope.
pub trait ResultSink {
    fn deliver(&mut self, envelope: &ResultEnvelope) -> Result<(), EventsError>;
}

/// Writes the envelope as UTF-8 JSON, non-ASCII characters left unescaped.
pub struct JsonSink<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonSink<W> {
    /// `pretty` selects two-space indentation; otherwise one line.
    pub fn new(writer: W, pretty: bool) -> Self {
        Self { writer, pretty }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for JsonSink<W> {
    fn deliver(&mut self, envelope: &ResultEnvelope) -> Result<(), EventsError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, envelope)?;
        } else {
            serde_json::to_writer(&mut self.writer, envelope)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
