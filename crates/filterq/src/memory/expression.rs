use std::fmt;
use std::sync::Arc;

use super::record::Record;

type Predicate = dyn Fn(&dyn Record) -> bool + Send + Sync;

/// A compiled predicate over records.
///
/// Cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct MemoryExpression {
    predicate: Arc<Predicate>,
}

impl MemoryExpression {
    pub fn new(predicate: impl Fn(&dyn Record) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// An expression that ignores the record.
    pub fn constant(result: bool) -> Self {
        Self::new(move |_| result)
    }

    pub fn evaluate(&self, record: &dyn Record) -> bool {
        (self.predicate)(record)
    }

    /// Returns the records the expression accepts, in order.
    pub fn filter<'r, R: Record>(&self, records: &'r [R]) -> Vec<&'r R> {
        records
            .iter()
            .filter(|record| self.evaluate(*record))
            .collect()
    }
}

impl fmt::Debug for MemoryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryExpression").finish_non_exhaustive()
    }
}
