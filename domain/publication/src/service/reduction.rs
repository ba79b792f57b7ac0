use std::path::Path;

use async_trait::async_trait;

use crate::exception::ReductionResult;
use crate::model::vo::SelectionCriteria;

/// # Reduction engine
///
/// Derives one audience artifact from a master artifact by filtering its
/// records against a criteria snapshot. The master is never mutated and the
/// output goes to a fresh path, never to the live serving location.
///
/// Deterministic: identical master bytes and identical criteria produce
/// byte-identical output, so a failed task can be re-run without side
/// effects. Any record that can't be checked against the hierarchy schema
/// fails the whole reduction; a truncated audience view is worse than none.
#[async_trait]
pub trait ReductionEngine: Send + Sync {
    async fn reduce(
        &self,
        master: &Path,
        criteria: &SelectionCriteria,
        output: &Path,
    ) -> ReductionResult<()>;
}
