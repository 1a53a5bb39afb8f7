use bson::Document as BsonDocument;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;
use std::time::Instant;

use crate::book::Book;
use crate::errors::StoreError;
use crate::explain::{ExplainReport, QueryPlan};
use crate::index::IndexSpec;
use crate::pipeline::{self, Stage};
use crate::query::{
    DeleteReport, Filter, FindOptions, UpdateDoc, UpdateReport, compare_docs, eval_filter,
    project_fields,
};
use crate::store::DocumentStore;
use crate::types::DocumentId;

struct Entry {
    id: DocumentId,
    body: BsonDocument,
}

struct Inner {
    entries: Vec<Entry>,
    indexes: Vec<IndexSpec>,
    connected: bool,
}

/// In-memory books collection. Documents keep insertion order; that order
/// is this store's default order: first match for single-document writes,
/// base order for unsorted finds, first-seen order for group rows, tie
/// order for stable sorts.
///
/// Clones share state, so a handle can be passed around cheaply.
#[derive(Clone)]
pub struct MemoryCollection {
    name: Arc<str>,
    inner: Arc<RwLock<Inner>>,
}

impl MemoryCollection {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            inner: Arc::new(RwLock::new(Inner {
                entries: Vec::new(),
                indexes: Vec::new(),
                connected: true,
            })),
        }
    }

    pub fn insert(&self, body: BsonDocument) -> Result<DocumentId, StoreError> {
        let mut inner = self.write_connected()?;
        let id = DocumentId::new();
        inner.entries.push(Entry { id: id.clone(), body });
        Ok(id)
    }

    pub fn insert_book(&self, book: &Book) -> Result<DocumentId, StoreError> {
        self.insert(book.to_document()?)
    }

    /// Fetch one document body by its assigned id.
    #[must_use]
    pub fn document(&self, id: &DocumentId) -> Option<BsonDocument> {
        self.inner.read().entries.iter().find(|e| &e.id == id).map(|e| e.body.clone())
    }

    /// Drop the connection. Store operations afterwards fail with
    /// `NotConnected`; introspection helpers keep working.
    pub fn close(&self) {
        log::info!("collection {}: closed", self.name);
        self.inner.write().connected = false;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Names of the declared indexes, in declaration order.
    #[must_use]
    pub fn index_names(&self) -> Vec<String> {
        self.inner.read().indexes.iter().map(IndexSpec::name).collect()
    }

    fn read_connected(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        let inner = self.inner.read();
        if inner.connected { Ok(inner) } else { Err(StoreError::NotConnected) }
    }

    fn write_connected(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        let inner = self.inner.write();
        if inner.connected { Ok(inner) } else { Err(StoreError::NotConnected) }
    }
}

impl DocumentStore for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn find(
        &self,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<BsonDocument>, StoreError> {
        let inner = self.read_connected()?;
        let mut docs: Vec<BsonDocument> = inner
            .entries
            .iter()
            .filter(|e| eval_filter(&e.body, filter))
            .map(|e| e.body.clone())
            .collect();
        drop(inner);

        if let Some(sort) = &options.sort {
            docs.sort_by(|a, b| compare_docs(a, b, sort));
        }
        if let Some(fields) = &options.projection {
            for d in &mut docs {
                *d = project_fields(d, fields);
            }
        }
        let skip = options.skip.unwrap_or(0);
        let limit = options.limit.unwrap_or(usize::MAX);
        Ok(docs.into_iter().skip(skip).take(limit).collect())
    }

    fn update_one(&self, filter: &Filter, update: &UpdateDoc) -> Result<UpdateReport, StoreError> {
        let mut inner = self.write_connected()?;
        if let Some(entry) = inner.entries.iter_mut().find(|e| eval_filter(&e.body, filter)) {
            let mut changed = false;
            for (field, value) in &update.set {
                let old = entry.body.insert(field.clone(), value.clone());
                if old.as_ref() != Some(value) {
                    changed = true;
                }
            }
            return Ok(UpdateReport { matched: 1, modified: u64::from(changed) });
        }
        Ok(UpdateReport { matched: 0, modified: 0 })
    }

    fn delete_one(&self, filter: &Filter) -> Result<DeleteReport, StoreError> {
        let mut inner = self.write_connected()?;
        if let Some(pos) = inner.entries.iter().position(|e| eval_filter(&e.body, filter)) {
            inner.entries.remove(pos);
            return Ok(DeleteReport { deleted: 1 });
        }
        Ok(DeleteReport { deleted: 0 })
    }

    fn aggregate(&self, stages: &[Stage]) -> Result<Vec<BsonDocument>, StoreError> {
        let inner = self.read_connected()?;
        let docs: Vec<BsonDocument> = inner.entries.iter().map(|e| e.body.clone()).collect();
        drop(inner);
        Ok(pipeline::execute(docs, stages))
    }

    fn create_index(&self, spec: &IndexSpec) -> Result<(), StoreError> {
        let mut inner = self.write_connected()?;
        spec.validate()?;
        let name = spec.name();
        if inner.indexes.iter().any(|existing| existing.name() == name) {
            return Ok(());
        }
        log::info!("collection {}: declared index {name}", self.name);
        inner.indexes.push(spec.clone());
        Ok(())
    }

    fn explain(&self, filter: &Filter) -> Result<ExplainReport, StoreError> {
        let start = Instant::now();
        let inner = self.read_connected()?;
        let total = inner.entries.len() as u64;
        let n_returned =
            inner.entries.iter().filter(|e| eval_filter(&e.body, filter)).count() as u64;

        // Leftmost-prefix rule: the first declared index whose leading field
        // appears among the filter's top-level comparison conjuncts wins.
        let parts = conjuncts(filter);
        let mut chosen: Option<(String, &Filter)> = None;
        'indexes: for spec in &inner.indexes {
            if let Some(lead) = spec.leading_field() {
                for part in parts.iter().copied() {
                    if let Filter::Cmp { path, .. } = part
                        && path.as_str() == lead
                    {
                        chosen = Some((spec.name(), part));
                        break 'indexes;
                    }
                }
            }
        }

        let report = match chosen {
            Some((index, part)) => {
                let keys =
                    inner.entries.iter().filter(|e| eval_filter(&e.body, part)).count() as u64;
                ExplainReport {
                    plan: QueryPlan::IndexScan { index },
                    n_returned,
                    docs_examined: keys,
                    keys_examined: keys,
                    execution_time_ms: elapsed_ms(start),
                }
            }
            None => ExplainReport {
                plan: QueryPlan::CollectionScan,
                n_returned,
                docs_examined: total,
                keys_examined: 0,
                execution_time_ms: elapsed_ms(start),
            },
        };
        Ok(report)
    }
}

fn conjuncts(filter: &Filter) -> Vec<&Filter> {
    match filter {
        Filter::And(fs) => fs.iter().flat_map(conjuncts).collect(),
        other => vec![other],
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
