//! Catalog use cases: browsing, posting and withdrawing listings.

use std::sync::Arc;

use tradepost_domain::marketplace::ProductSummary;
use tradepost_domain::{ApiRequest, Category, Page, Product, ProductDraft, ProductQuery};

use crate::auth::AuthenticatedClient;
use crate::endpoints;
use crate::error::ApiResult;
use crate::ports::{CredentialStore, HttpTransport};

/// Listing operations against the products API.
///
/// Browsing works anonymously; posting, listing one's own items and
/// deleting require a session.
pub struct Catalog<T: HttpTransport, S: CredentialStore> {
    client: Arc<AuthenticatedClient<T, S>>,
}

impl<T: HttpTransport, S: CredentialStore> Catalog<T, S> {
    /// Creates a new `Catalog`.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedClient<T, S>>) -> Self {
        Self { client }
    }

    /// Searches available listings.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn search(&self, query: &ProductQuery) -> ApiResult<Vec<ProductSummary>> {
        let request = query
            .to_pairs()
            .into_iter()
            .fold(ApiRequest::get(endpoints::PRODUCTS), |req, (k, v)| {
                req.with_query(k, v)
            });
        let page: Page<ProductSummary> = self.client.send_json(request).await?;
        Ok(page.into_items())
    }

    /// Lists all categories.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn categories(&self) -> ApiResult<Vec<Category>> {
        let page: Page<Category> = self.client.get(endpoints::CATEGORIES).await?;
        Ok(page.into_items())
    }

    /// Loads a single listing.
    ///
    /// # Errors
    /// Returns a 404 status error for unknown or sold listings.
    pub async fn product(&self, id: i64) -> ApiResult<Product> {
        self.client.get(endpoints::product(id)).await
    }

    /// Posts a new listing owned by the current user.
    ///
    /// # Errors
    /// Returns the validation failure if a field is rejected.
    pub async fn create(&self, draft: &ProductDraft) -> ApiResult<Product> {
        let product: Product = self.client.post(endpoints::PRODUCT_CREATE, draft).await?;
        tracing::info!(id = product.id, title = %product.title, "listing created");
        Ok(product)
    }

    /// Lists the current user's listings, sold ones included.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn mine(&self) -> ApiResult<Vec<ProductSummary>> {
        let page: Page<ProductSummary> = self.client.get(endpoints::MY_PRODUCTS).await?;
        Ok(page.into_items())
    }

    /// Deletes one of the current user's listings.
    ///
    /// # Errors
    /// Returns a 404 status error if the listing is not the user's.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete::<()>(endpoints::product_edit(id)).await?;
        tracing::info!(id, "listing deleted");
        Ok(())
    }
}
