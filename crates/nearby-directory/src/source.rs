use std::sync::Arc;

use async_trait::async_trait;
use nearby_client::{CatalogClient, FetchError};
use nearby_core::BusinessRecord;

/// Anything that can produce a full catalog snapshot.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<BusinessRecord>, FetchError>;
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_all(&self) -> Result<Vec<BusinessRecord>, FetchError> {
        CatalogClient::fetch_all(self).await
    }
}

#[async_trait]
impl<T: CatalogSource + ?Sized> CatalogSource for Arc<T> {
    async fn fetch_all(&self) -> Result<Vec<BusinessRecord>, FetchError> {
        (**self).fetch_all().await
    }
}
