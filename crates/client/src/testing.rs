//! In-memory stand-in for the hosted table store.
//!
//! Behaves like the real backend where the client depends on it: keys are
//! unique, profile and entry rows must reference a registered key, and rows
//! of `journals` / `entries` (and `keys` lookups) are scoped to the
//! `x-user-key` the handle was built with. Failures can be injected per table
//! and operation.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use journey_api_client::{ApiError, ClientFactory, Direction, Filter, Select, TableStore};
use journey_core::{AccessKey, KEYS_TABLE};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Insert,
    Select,
    Delete,
}

/// One request as the backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: Op,
    pub table: String,
    pub user_key: String,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, Vec<Value>>,
    failures: HashSet<(String, Op)>,
    unavailable: bool,
    calls: Vec<Call>,
}

/// Shared in-memory backend. Clones see the same tables.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make every `op` on `table` fail with a 503 until [`Self::heal`].
    pub fn fail(&self, table: &str, op: Op) {
        self.lock().failures.insert((table.to_string(), op));
    }

    /// Make every request fail, as if the backend were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    pub fn heal(&self) {
        let mut inner = self.lock();
        inner.failures.clear();
        inner.unavailable = false;
    }

    /// Register a key directly, bypassing the client.
    pub fn register_key(&self, key: &AccessKey) {
        self.seed(KEYS_TABLE, serde_json::json!({ "user_key": key.as_str() }));
    }

    /// Insert a row directly, bypassing every check.
    pub fn seed(&self, table: &str, row: Value) {
        self.lock()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, op: Op, table: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.op == op && c.table == table)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.lock().calls.len()
    }
}

impl ClientFactory for MemoryBackend {
    type Client = MemoryClient;

    fn build(&self, user_key: Option<&str>) -> Result<MemoryClient, ApiError> {
        Ok(MemoryClient {
            backend: self.clone(),
            user_key: user_key.unwrap_or_default().to_string(),
        })
    }
}

/// Handle bound to one claimed key.
#[derive(Clone)]
pub struct MemoryClient {
    backend: MemoryBackend,
    user_key: String,
}

impl MemoryClient {
    /// Record the call and apply injected failures.
    fn begin(&self, op: Op, table: &str) -> Result<MutexGuard<'_, Inner>, ApiError> {
        let mut inner = self.backend.lock();
        inner.calls.push(Call {
            op,
            table: table.to_string(),
            user_key: self.user_key.clone(),
        });
        if inner.unavailable || inner.failures.contains(&(table.to_string(), op)) {
            return Err(status(503, "service unavailable"));
        }
        Ok(inner)
    }

    fn owns(&self, row: &Value) -> bool {
        !self.user_key.is_empty() && column(row, "user_key").as_deref() == Some(self.user_key.as_str())
    }
}

impl TableStore for MemoryClient {
    fn user_key(&self) -> &str {
        &self.user_key
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), ApiError> {
        let mut inner = self.begin(Op::Insert, table)?;
        if !self.owns(&row) {
            return Err(status(403, "new row violates row-level security policy"));
        }
        let registered = inner
            .tables
            .get(KEYS_TABLE)
            .is_some_and(|rows| rows.iter().any(|r| self.owns(r)));
        if table == KEYS_TABLE {
            if registered {
                return Err(status(
                    409,
                    "duplicate key value violates unique constraint \"keys_pkey\"",
                ));
            }
        } else if !registered {
            return Err(status(
                409,
                "insert or update violates foreign key constraint",
            ));
        }
        inner.tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    async fn select(&self, table: &str, query: &Select) -> Result<Vec<Value>, ApiError> {
        let inner = self.begin(Op::Select, table)?;
        let mut rows: Vec<(usize, Value)> = inner
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .enumerate()
                    .filter(|(_, row)| self.owns(row) && matches_all(row, &query.filters))
                    .map(|(idx, row)| (idx, row.clone()))
                    .collect()
            })
            .unwrap_or_default();
        drop(inner);

        if let Some(ref order) = query.order {
            rows.sort_by(|(ia, a), (ib, b)| {
                let ord = compare_column(a, b, &order.column).then(ia.cmp(ib));
                match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(rows
            .into_iter()
            .take(limit)
            .map(|(_, row)| project(row, &query.columns))
            .collect())
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), ApiError> {
        let mut inner = self.begin(Op::Delete, table)?;
        if let Some(rows) = inner.tables.get_mut(table) {
            rows.retain(|row| !(self.owns(row) && matches_all(row, filters)));
        }
        Ok(())
    }
}

fn status(code: u16, message: &str) -> ApiError {
    ApiError::Status {
        status: code,
        message: message.to_string(),
    }
}

fn column(row: &Value, name: &str) -> Option<String> {
    match row.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn matches_all(row: &Value, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|f| column(row, &f.column).as_deref() == Some(f.value.as_str()))
}

fn compare_column(a: &Value, b: &Value, name: &str) -> Ordering {
    let (a, b) = (column(a, name), column(b, name));
    let as_time = |v: &Option<String>| {
        v.as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    };
    match (as_time(&a), as_time(&b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.cmp(&b),
    }
}

fn project(row: Value, columns: &str) -> Value {
    if columns.trim() == "*" {
        return row;
    }
    let mut out = serde_json::Map::new();
    for name in columns.split(',').map(str::trim) {
        if let Some(v) = row.get(name) {
            out.insert(name.to_string(), v.clone());
        }
    }
    Value::Object(out)
}
