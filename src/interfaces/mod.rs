//! File formats used by the replay binary.

pub mod csv {
    pub mod attempt_writer;
    pub mod update_reader;
}

pub mod json {
    pub mod subscriptions;
}
