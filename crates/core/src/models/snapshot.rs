/// Identifies one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// In-memory copy of the records last fetched from the backend.
///
/// Every fetch takes a ticket; only the newest ticket may replace the
/// records, so a slow response that lands after a newer request is dropped.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    records: Vec<T>,
    issued: u64,
    applied: u64,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            issued: 0,
            applied: 0,
        }
    }
}

impl<T> Snapshot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch. Any ticket handed out earlier becomes stale.
    pub fn begin(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Install the records of a finished fetch.
    /// Returns `false` (and keeps the current records) for a stale ticket.
    pub fn apply(&mut self, ticket: FetchTicket, records: Vec<T>) -> bool {
        if ticket.0 != self.issued {
            return false;
        }
        self.records = records;
        self.applied = ticket.0;
        true
    }

    /// `true` once any fetch has been applied.
    pub fn is_loaded(&self) -> bool {
        self.applied > 0
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Drop the records (e.g. on logout) and invalidate in-flight fetches.
    pub fn clear(&mut self) {
        self.records.clear();
        self.issued += 1;
        self.applied = 0;
    }
}
