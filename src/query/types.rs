use bson::Bson;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: Order,
}

/// Options for a find request. Sort applies before projection; skip before
/// limit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindOptions {
    pub projection: Option<Vec<String>>,
    pub sort: Option<Vec<SortSpec>>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum CmpOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone)]
pub enum Filter {
    True,
    And(Vec<Filter>),
    Cmp { path: String, op: CmpOp, value: Bson },
}

impl Filter {
    #[must_use]
    pub fn eq(path: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::Cmp { path: path.into(), op: CmpOp::Eq, value: value.into() }
    }

    #[must_use]
    pub fn gt(path: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::Cmp { path: path.into(), op: CmpOp::Gt, value: value.into() }
    }
}

#[derive(Debug, Default, Clone)]
pub struct UpdateDoc {
    pub set: Vec<(String, Bson)>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    pub deleted: u64,
}
