use std::future::Future;

use serde_json::Value;

use crate::error::ApiError;
use crate::query::{Filter, Select};

/// Generic row access to the hosted table store.
///
/// A handle is bound to one claimed access key for its whole life; the
/// backend scopes every row by that key. Nothing here checks ownership,
/// that decision belongs to the store.
pub trait TableStore: Send + Sync {
    /// Key sent with every request, empty when signed out.
    fn user_key(&self) -> &str;

    /// Insert one row.
    fn insert(&self, table: &str, row: Value) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Rows matching `query`, in the order it asks for.
    fn select(
        &self,
        table: &str,
        query: &Select,
    ) -> impl Future<Output = Result<Vec<Value>, ApiError>> + Send;

    /// Delete the rows matching every filter. Matching nothing is not an error.
    fn delete(
        &self,
        table: &str,
        filters: &[Filter],
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Builds table-store handles for a given access key.
///
/// Handles are never re-keyed in place: a key change means building a new
/// one, so no request can leave with a stale credential.
pub trait ClientFactory: Send + Sync {
    type Client: TableStore;

    fn build(&self, user_key: Option<&str>) -> Result<Self::Client, ApiError>;
}
