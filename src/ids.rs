use uuid::Uuid;

/// Source of ids for newly authored tasks.
///
/// Kept outside the engine so scheduling stays free of clocks and randomness.
pub trait IdIssuer {
    fn issue(&mut self) -> String;
}

impl<F> IdIssuer for F
where
    F: FnMut() -> String,
{
    fn issue(&mut self) -> String {
        self()
    }
}

/// Deterministic `task-1`, `task-2`, ... ids.
#[derive(Debug, Clone)]
pub struct SequentialIdIssuer {
    prefix: String,
    next: u64,
}

impl SequentialIdIssuer {
    pub fn new() -> Self {
        Self::with_prefix("task")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Continue numbering after ids that already exist, e.g. after an import.
    pub fn starting_at(mut self, next: u64) -> Self {
        self.next = next;
        self
    }
}

impl Default for SequentialIdIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl IdIssuer for SequentialIdIssuer {
    fn issue(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdIssuer;

impl IdIssuer for UuidIdIssuer {
    fn issue(&mut self) -> String {
        format!("task-{}", Uuid::new_v4().simple())
    }
}
