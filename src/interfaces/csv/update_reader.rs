use crate::domain::transition::OrderUpdate;
use crate::error::{LifecycleError, Result};
use std::io::Read;

/// Reads upstream status callbacks from a CSV source.
///
/// Expected header: `order_id, account_id, customer_email, product_type,
/// product_sub_type, status`. Whitespace around fields is trimmed; the status
/// itself is left raw for the emitter to classify.
pub struct OrderUpdateReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OrderUpdateReader<R> {
    /// Creates a new `OrderUpdateReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes updates.
    pub fn updates(self) -> impl Iterator<Item = Result<OrderUpdate>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LifecycleError::from))
    }
}
