use bson::{Bson, Document as BsonDocument};
use std::cmp::Ordering;

use super::types::{CmpOp, Filter, Order, SortSpec};

pub fn eval_filter(doc: &BsonDocument, filter: &Filter) -> bool {
    match filter {
        Filter::True => true,
        Filter::And(fs) => fs.iter().all(|f| eval_filter(doc, f)),
        Filter::Cmp { path, op, value } => {
            if let Some(v) = doc.get(path) {
                match op {
                    CmpOp::Eq => v == value,
                    CmpOp::Gt => compare_bson(v, value) == Ordering::Greater,
                    CmpOp::Gte => {
                        let c = compare_bson(v, value);
                        c == Ordering::Greater || c == Ordering::Equal
                    }
                    CmpOp::Lt => compare_bson(v, value) == Ordering::Less,
                    CmpOp::Lte => {
                        let c = compare_bson(v, value);
                        c == Ordering::Less || c == Ordering::Equal
                    }
                }
            } else {
                false
            }
        }
    }
}

pub fn compare_docs(a: &BsonDocument, b: &BsonDocument, sort: &[SortSpec]) -> Ordering {
    for s in sort {
        let va = a.get(&s.field);
        let vb = b.get(&s.field);
        let ord = match (va, vb) {
            (Some(x), Some(y)) => compare_bson(x, y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return if matches!(s.order, Order::Asc) { ord } else { ord.reverse() };
        }
    }
    Ordering::Equal
}

pub fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    use bson::Bson as T;
    fn is_num(x: &T) -> bool {
        matches!(x, T::Int32(_) | T::Int64(_) | T::Double(_) | T::Decimal128(_))
    }
    fn as_f64_num(x: &T) -> f64 {
        match x {
            T::Int32(i) => f64::from(*i),
            T::Int64(i) => *i as f64,
            T::Double(f) => *f,
            T::Decimal128(d) => d.to_string().parse::<f64>().unwrap_or(f64::NAN),
            _ => f64::NAN,
        }
    }
    if is_num(a) && is_num(b) {
        return as_f64_num(a).total_cmp(&as_f64_num(b));
    }
    match (a, b) {
        (T::String(x), T::String(y)) => x.cmp(y),
        (T::Boolean(x), T::Boolean(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(v: &Bson) -> u8 {
    use bson::Bson as T;
    match v {
        T::Null => 0,
        T::Boolean(_) => 1,
        T::Int32(_) => 2,
        T::Int64(_) => 3,
        T::Double(_) => 4,
        T::String(_) => 5,
        T::Array(_) => 6,
        T::Document(_) => 7,
        T::Binary(_) => 8,
        T::ObjectId(_) => 9,
        T::DateTime(_) => 10,
        T::RegularExpression(_) => 11,
        T::Timestamp(_) => 12,
        T::Symbol(_) => 13,
        T::Decimal128(_) => 14,
        T::Undefined => 15,
        T::DbPointer(_) => 16,
        T::JavaScriptCode(_) => 17,
        T::JavaScriptCodeWithScope(_) => 18,
        T::MaxKey => 250,
        T::MinKey => 251,
    }
}

pub fn project_fields(doc: &BsonDocument, fields: &[String]) -> BsonDocument {
    let mut out = BsonDocument::new();
    for f in fields {
        if let Some(v) = doc.get(f) {
            out.insert(f.clone(), v.clone());
        }
    }
    out
}
