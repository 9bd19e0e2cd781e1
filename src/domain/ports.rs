use crate::domain::model::Observation;
use async_trait::async_trait;

/// A marketplace queried for price listings.
///
/// `search` never fails: a source that errors out, times out internally, or
/// finds nothing resolves to an empty list, and the engine decides what to do
/// about it. Failure isolation between sources lives here, not in the caller.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Source label used for grouping and statistics in the report.
    fn label(&self) -> &str;

    async fn search(&self, product_name: &str) -> Vec<Observation>;
}
