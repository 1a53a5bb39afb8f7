use bson::{Bson, Document as BsonDocument};

use crate::query::{Order, SortSpec, compare_docs};

/// One aggregation stage. A pipeline is a slice of stages applied in order
/// over owned documents.
#[derive(Debug, Clone)]
pub enum Stage {
    /// Replace each document with exactly the computed fields.
    Project(Vec<(String, Expr)>),
    /// One output row per distinct key. The key lands in `_id`; rows come
    /// out in first-seen key order.
    Group { key: Expr, accumulators: Vec<(String, Accumulator)> },
    Sort(Vec<SortSpec>),
    Limit(usize),
}

impl Stage {
    #[must_use]
    pub fn project(fields: Vec<(&str, Expr)>) -> Self {
        Self::Project(fields.into_iter().map(|(k, e)| (k.to_string(), e)).collect())
    }

    #[must_use]
    pub fn group(key: Expr, accumulators: Vec<(&str, Accumulator)>) -> Self {
        Self::Group {
            key,
            accumulators: accumulators.into_iter().map(|(k, a)| (k.to_string(), a)).collect(),
        }
    }

    #[must_use]
    pub fn sort_asc(field: &str) -> Self {
        Self::Sort(vec![SortSpec { field: field.to_string(), order: Order::Asc }])
    }

    #[must_use]
    pub fn sort_desc(field: &str) -> Self {
        Self::Sort(vec![SortSpec { field: field.to_string(), order: Order::Desc }])
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Field(String),
    Literal(Bson),
    /// Character range of the stringified input. Numeric input is
    /// stringified first (legacy `$substr` coercion); null or
    /// non-stringifiable input yields the empty string.
    Substr { input: Box<Expr>, start: usize, len: usize },
    /// Concatenation of stringified parts; null if any part is null or
    /// non-stringifiable.
    Concat(Vec<Expr>),
}

impl Expr {
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    #[must_use]
    pub fn literal(value: impl Into<Bson>) -> Self {
        Self::Literal(value.into())
    }

    #[must_use]
    pub fn substr(input: Self, start: usize, len: usize) -> Self {
        Self::Substr { input: Box::new(input), start, len }
    }

    #[must_use]
    pub fn eval(&self, doc: &BsonDocument) -> Bson {
        match self {
            Self::Field(name) => doc.get(name).cloned().unwrap_or(Bson::Null),
            Self::Literal(v) => v.clone(),
            Self::Substr { input, start, len } => {
                let s = stringify(&input.eval(doc)).unwrap_or_default();
                Bson::String(s.chars().skip(*start).take(*len).collect())
            }
            Self::Concat(parts) => {
                let mut out = String::new();
                for part in parts {
                    match stringify(&part.eval(doc)) {
                        Some(s) => out.push_str(&s),
                        None => return Bson::Null,
                    }
                }
                Bson::String(out)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Accumulator {
    Sum(Expr),
    Avg(Expr),
}

impl Accumulator {
    /// Row count, expressed as a sum of literal 1 per document.
    #[must_use]
    pub fn count() -> Self {
        Self::Sum(Expr::Literal(Bson::Int32(1)))
    }

    #[must_use]
    pub fn sum(expr: Expr) -> Self {
        Self::Sum(expr)
    }

    #[must_use]
    pub fn avg(expr: Expr) -> Self {
        Self::Avg(expr)
    }
}

#[must_use]
pub fn execute(docs: Vec<BsonDocument>, stages: &[Stage]) -> Vec<BsonDocument> {
    let mut rows = docs;
    for stage in stages {
        rows = apply_stage(rows, stage);
    }
    rows
}

fn apply_stage(rows: Vec<BsonDocument>, stage: &Stage) -> Vec<BsonDocument> {
    match stage {
        Stage::Project(fields) => rows
            .iter()
            .map(|doc| {
                let mut out = BsonDocument::new();
                for (name, expr) in fields {
                    out.insert(name.clone(), expr.eval(doc));
                }
                out
            })
            .collect(),
        Stage::Group { key, accumulators } => group_rows(&rows, key, accumulators),
        Stage::Sort(specs) => {
            let mut rows = rows;
            rows.sort_by(|a, b| compare_docs(a, b, specs));
            rows
        }
        Stage::Limit(n) => {
            let mut rows = rows;
            rows.truncate(*n);
            rows
        }
    }
}

fn group_rows(
    rows: &[BsonDocument],
    key: &Expr,
    accumulators: &[(String, Accumulator)],
) -> Vec<BsonDocument> {
    let mut keys: Vec<Bson> = Vec::new();
    let mut states: Vec<Vec<AccState>> = Vec::new();
    for row in rows {
        let k = key.eval(row);
        let idx = match keys.iter().position(|existing| existing == &k) {
            Some(i) => i,
            None => {
                keys.push(k);
                states.push(accumulators.iter().map(|(_, a)| AccState::new(a)).collect());
                keys.len() - 1
            }
        };
        for (state, (_, acc)) in states[idx].iter_mut().zip(accumulators) {
            state.feed(acc, row);
        }
    }
    keys.into_iter()
        .zip(states)
        .map(|(k, row_states)| {
            let mut out = BsonDocument::new();
            out.insert("_id", k);
            for ((name, _), state) in accumulators.iter().zip(row_states) {
                out.insert(name.clone(), state.finish());
            }
            out
        })
        .collect()
}

enum AccState {
    Sum(SumTotal),
    Avg { total: f64, count: u64 },
}

/// Integer totals stay Int64; the first Double input promotes the whole
/// total to Double.
enum SumTotal {
    Int(i64),
    Float(f64),
}

impl AccState {
    fn new(acc: &Accumulator) -> Self {
        match acc {
            Accumulator::Sum(_) => Self::Sum(SumTotal::Int(0)),
            Accumulator::Avg(_) => Self::Avg { total: 0.0, count: 0 },
        }
    }

    fn feed(&mut self, acc: &Accumulator, row: &BsonDocument) {
        let expr = match acc {
            Accumulator::Sum(e) | Accumulator::Avg(e) => e,
        };
        let value = expr.eval(row);
        match self {
            Self::Sum(total) => match value {
                Bson::Int32(i) => total.add_int(i64::from(i)),
                Bson::Int64(i) => total.add_int(i),
                Bson::Double(f) => total.add_float(f),
                // non-numeric input does not contribute
                _ => {}
            },
            Self::Avg { total, count } => {
                if let Some(f) = numeric(&value) {
                    *total += f;
                    *count += 1;
                }
            }
        }
    }

    fn finish(self) -> Bson {
        match self {
            Self::Sum(SumTotal::Int(i)) => Bson::Int64(i),
            Self::Sum(SumTotal::Float(f)) => Bson::Double(f),
            Self::Avg { count: 0, .. } => Bson::Null,
            Self::Avg { total, count } => Bson::Double(total / count as f64),
        }
    }
}

impl SumTotal {
    fn add_int(&mut self, v: i64) {
        match self {
            Self::Int(i) => *i = i.saturating_add(v),
            Self::Float(f) => *f += v as f64,
        }
    }

    fn add_float(&mut self, v: f64) {
        match self {
            Self::Int(i) => *self = Self::Float(*i as f64 + v),
            Self::Float(f) => *f += v,
        }
    }
}

fn numeric(v: &Bson) -> Option<f64> {
    match v {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

fn stringify(v: &Bson) -> Option<String> {
    match v {
        Bson::String(s) => Some(s.clone()),
        Bson::Int32(i) => Some(i.to_string()),
        Bson::Int64(i) => Some(i.to_string()),
        Bson::Double(f) => Some(format!("{f}")),
        Bson::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}
