use std::future::Future;

use futures_util::{StreamExt, stream};
use tracing::warn;

use crate::client::BackendClient;
use crate::error::BackendError;

impl BackendClient {
    /// Run `op` once per id with at most `bulk_concurrency` calls in
    /// flight. Every id gets a result; one failure never cancels the rest.
    /// Results come back in completion order, not input order.
    pub async fn for_each_bounded<T, F, Fut>(
        &self,
        ids: Vec<String>,
        op: F,
    ) -> Vec<(String, Result<T, BackendError>)>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        stream::iter(ids)
            .map(|id| {
                let fut = op(id.clone());
                async move {
                    let result = fut.await;
                    if let Err(e) = &result {
                        warn!("bulk item {} failed: {}", id, e);
                    }
                    (id, result)
                }
            })
            .buffer_unordered(self.bulk_concurrency)
            .collect()
            .await
    }
}
