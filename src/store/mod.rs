use async_trait::async_trait;

use crate::errors::StoreResult;
use crate::filter::{PageRequest, ProductFilter};
use crate::models::{Category, NewProduct, Product, User};
use crate::response::PageResult;

#[cfg(test)]
pub mod memory;
pub mod mongo;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact, case-sensitive lookup.
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn exists_by_username(&self, username: &str) -> StoreResult<bool>;
    async fn insert(&self, user: User) -> StoreResult<User>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_all(&self) -> StoreResult<Vec<Product>>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Product>>;
    async fn exists_by_name_ignore_case(&self, name: &str) -> StoreResult<bool>;
    /// Persists a new product under a freshly assigned id.
    async fn insert(&self, product: NewProduct) -> StoreResult<Product>;
    /// Overwrites the stored product with the same id.
    async fn replace(&self, product: Product) -> StoreResult<Product>;
    async fn delete_by_id(&self, id: i64) -> StoreResult<()>;
    /// Matching products ordered by name descending, sliced to one page.
    async fn search(&self, filter: &ProductFilter, page: PageRequest) -> StoreResult<PageResult<Product>>;
    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>>;
    async fn find_all_categories(&self) -> StoreResult<Vec<Category>>;
}
