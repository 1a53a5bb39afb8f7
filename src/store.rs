use bson::Document as BsonDocument;

use crate::errors::StoreError;
use crate::explain::ExplainReport;
use crate::index::IndexSpec;
use crate::pipeline::Stage;
use crate::query::{DeleteReport, Filter, FindOptions, UpdateDoc, UpdateReport};

/// Capability surface of a books collection handle.
///
/// Anything that can find, update one, delete one, aggregate, declare an
/// index, and explain a query can back the typed operations. Blocking
/// behavior, timeouts, and ordering between calls are the implementor's
/// business; this trait adds none.
pub trait DocumentStore {
    /// Collection name, used in log and telemetry lines.
    fn name(&self) -> &str;

    /// Matching documents after filter, sort, projection, skip and limit,
    /// in that order.
    fn find(&self, filter: &Filter, options: &FindOptions)
    -> Result<Vec<BsonDocument>, StoreError>;

    /// Apply `update` to the first match in the store's default order.
    fn update_one(&self, filter: &Filter, update: &UpdateDoc) -> Result<UpdateReport, StoreError>;

    /// Remove the first match in the store's default order.
    fn delete_one(&self, filter: &Filter) -> Result<DeleteReport, StoreError>;

    /// Run the stages in order and return the resulting rows.
    fn aggregate(&self, pipeline: &[Stage]) -> Result<Vec<BsonDocument>, StoreError>;

    /// Declare an index. Re-declaring an existing index is a no-op;
    /// malformed specs are rejected with `StoreOperationFailed`.
    fn create_index(&self, spec: &IndexSpec) -> Result<(), StoreError>;

    /// Describe how `filter` would execute, without touching store state.
    fn explain(&self, filter: &Filter) -> Result<ExplainReport, StoreError>;
}
