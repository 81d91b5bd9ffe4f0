use crate::domain::webhook::{DeliveryAttempt, DeliveryOutcome};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct AttemptRow<'a> {
    subscription_id: &'a str,
    event: &'a str,
    order_id: &'a str,
    url: &'a str,
    outcome: &'a str,
    detail: String,
}

impl<'a> From<&'a DeliveryAttempt> for AttemptRow<'a> {
    fn from(attempt: &'a DeliveryAttempt) -> Self {
        let (outcome, detail) = match &attempt.outcome {
            DeliveryOutcome::Success { status } => ("success", status.to_string()),
            DeliveryOutcome::Failure { error } => ("failure", error.clone()),
        };
        Self {
            subscription_id: &attempt.subscription_id,
            event: &attempt.event_name,
            order_id: &attempt.order_id,
            url: &attempt.url,
            outcome,
            detail,
        }
    }
}

/// Writes delivery attempts as CSV, one row per attempt.
pub struct DeliveryAttemptWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> DeliveryAttemptWriter<W> {
    pub fn new(sink: W) -> Self {
        // Header is written by hand so an empty run still produces one.
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        Self { writer }
    }

    /// Writes the header followed by every attempt, then flushes.
    ///
    /// The header is written even when there are no attempts.
    pub fn write_attempts(&mut self, attempts: &[DeliveryAttempt]) -> Result<()> {
        self.writer.write_record([
            "subscription_id",
            "event",
            "order_id",
            "url",
            "outcome",
            "detail",
        ])?;
        for attempt in attempts {
            self.writer.serialize(AttemptRow::from(attempt))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn attempt(id: &str, outcome: DeliveryOutcome) -> DeliveryAttempt {
        DeliveryAttempt {
            subscription_id: id.to_string(),
            event_name: "ORDER_CREATED".to_string(),
            transition_id: Uuid::new_v4(),
            order_id: "O1".to_string(),
            url: format!("https://tenant/{id}"),
            outcome,
        }
    }

    #[test]
    fn test_writes_header_and_rows() {
        let mut out = Vec::new();
        DeliveryAttemptWriter::new(&mut out)
            .write_attempts(&[
                attempt("s1", DeliveryOutcome::Success { status: 200 }),
                attempt(
                    "s2",
                    DeliveryOutcome::Failure {
                        error: "delivery to https://tenant/s2 failed: connection refused".into(),
                    },
                ),
            ])
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "subscription_id,event,order_id,url,outcome,detail");
        assert_eq!(lines[1], "s1,ORDER_CREATED,O1,https://tenant/s1,success,200");
        assert_eq!(
            lines[2],
            "s2,ORDER_CREATED,O1,https://tenant/s2,failure,delivery to https://tenant/s2 failed: connection refused"
        );
    }

    #[test]
    fn test_header_only_when_empty() {
        let mut out = Vec::new();
        DeliveryAttemptWriter::new(&mut out).write_attempts(&[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "subscription_id,event,order_id,url,outcome,detail\n"
        );
    }
}
