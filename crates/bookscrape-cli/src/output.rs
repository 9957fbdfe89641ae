//! Record sinks that serialize to any `Write` target.

use std::io::Write;

use bookscrape_core::NormalizedRecord;
use bookscrape_scraper::RecordSink;

/// Writes each record as one JSON object per line, as soon as it arrives.
pub(crate) struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    pub(crate) fn finish(mut self) -> std::io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    type Error = serde_json::Error;

    fn accept(&mut self, record: NormalizedRecord) -> Result<(), Self::Error> {
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n").map_err(serde_json::Error::io)
    }
}

/// Buffers records and writes them as a single pretty JSON array on `finish`.
pub(crate) struct JsonArraySink<W: Write> {
    writer: W,
    records: Vec<NormalizedRecord>,
}

impl<W: Write> JsonArraySink<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self {
            writer,
            records: Vec::new(),
        }
    }

    pub(crate) fn finish(mut self) -> Result<W, serde_json::Error> {
        serde_json::to_writer_pretty(&mut self.writer, &self.records)?;
        self.writer
            .write_all(b"\n")
            .and_then(|()| self.writer.flush())
            .map_err(serde_json::Error::io)?;
        Ok(self.writer)
    }
}

impl<W: Write> RecordSink for JsonArraySink<W> {
    type Error = serde_json::Error;

    fn accept(&mut self, record: NormalizedRecord) -> Result<(), Self::Error> {
        self.records.push(record);
        Ok(())
    }
}
