use std::convert::Infallible;

use bookscrape_core::NormalizedRecord;

/// Destination for normalized records as the crawl produces them.
pub trait RecordSink {
    type Error;

    /// Accepts one record.
    ///
    /// # Errors
    ///
    /// Implementation-defined; an error aborts the crawl.
    fn accept(&mut self, record: NormalizedRecord) -> Result<(), Self::Error>;
}

impl RecordSink for Vec<NormalizedRecord> {
    type Error = Infallible;

    fn accept(&mut self, record: NormalizedRecord) -> Result<(), Self::Error> {
        self.push(record);
        Ok(())
    }
}
