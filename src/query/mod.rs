// Submodules for separation of concerns
mod cursor;
mod eval;
mod types;

// Public API re-exports
pub use cursor::Cursor;
pub use eval::{compare_bson, compare_docs, eval_filter, project_fields};
pub use types::{
    CmpOp, DeleteReport, Filter, FindOptions, Order, SortSpec, UpdateDoc, UpdateReport,
};
