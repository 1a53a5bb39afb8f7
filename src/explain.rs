use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryPlan {
    CollectionScan,
    IndexScan { index: String },
}

/// Execution statistics for one query, the shape of an `executionStats`
/// explain run. Diagnostic only; producing it must not change store state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainReport {
    pub plan: QueryPlan,
    pub n_returned: u64,
    pub docs_examined: u64,
    pub keys_examined: u64,
    pub execution_time_ms: u64,
}

impl ExplainReport {
    /// Short plan description: `COLLSCAN` or `IXSCAN { <index name> }`.
    #[must_use]
    pub fn plan_summary(&self) -> String {
        match &self.plan {
            QueryPlan::CollectionScan => "COLLSCAN".to_string(),
            QueryPlan::IndexScan { index } => format!("IXSCAN {{ {index} }}"),
        }
    }
}
