use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};

use crate::errors::{StoreError, StoreResult};
use crate::filter::{PageRequest, ProductFilter};
use crate::models::{Category, Counter, NewProduct, Product, User};
use crate::response::PageResult;
use crate::store::{CatalogStore, CredentialStore};

pub const USERS: &str = "users";
pub const CATEGORIES: &str = "categories";
pub const PRODUCTS: &str = "products";
pub const COUNTERS: &str = "counters";

#[derive(Clone)]
pub struct MongoCredentialStore {
    users: Collection<User>,
}

impl MongoCredentialStore {
    pub fn new(db: &Database) -> Self {
        MongoCredentialStore {
            users: db.collection(USERS),
        }
    }
}

#[async_trait]
impl CredentialStore for MongoCredentialStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.users.find_one(doc! { "username": username }, None).await?)
    }

    async fn exists_by_username(&self, username: &str) -> StoreResult<bool> {
        let count = self
            .users
            .count_documents(doc! { "username": username }, None)
            .await?;
        Ok(count > 0)
    }

    async fn insert(&self, user: User) -> StoreResult<User> {
        self.users.insert_one(&user, None).await?;
        Ok(user)
    }
}

#[derive(Clone)]
pub struct MongoCatalogStore {
    products: Collection<Product>,
    categories: Collection<Category>,
    counters: Collection<Counter>,
}

impl MongoCatalogStore {
    pub fn new(db: &Database) -> Self {
        MongoCatalogStore {
            products: db.collection(PRODUCTS),
            categories: db.collection(CATEGORIES),
            counters: db.collection(COUNTERS),
        }
    }

    async fn next_id(&self, seq_name: &str) -> StoreResult<i64> {
        // Increment the sequence value, creating the counter if it doesn't exist
        let filter = doc! { "_id": seq_name };
        let update = doc! { "$inc": { "seq": 1_i64 } };

        // Return the document after the update
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        match self.counters.find_one_and_update(filter, update, options).await? {
            Some(counter) => Ok(counter.seq),
            None => Err(StoreError::Backend(format!(
                "Failed to generate sequence value for {}",
                seq_name
            ))),
        }
    }
}

#[async_trait]
impl CatalogStore for MongoCatalogStore {
    async fn find_all(&self) -> StoreResult<Vec<Product>> {
        let cursor = self.products.find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Product>> {
        Ok(self.products.find_one(doc! { "_id": id }, None).await?)
    }

    async fn exists_by_name_ignore_case(&self, name: &str) -> StoreResult<bool> {
        // Anchored, escaped regex so only whole-name matches count
        let pattern = format!("^{}$", regex::escape(name));
        let count = self
            .products
            .count_documents(doc! { "name": { "$regex": pattern, "$options": "i" } }, None)
            .await?;
        Ok(count > 0)
    }

    async fn insert(&self, product: NewProduct) -> StoreResult<Product> {
        // Get the next product id from the counters collection
        let id = self.next_id(PRODUCTS).await?;
        let product = product.with_id(id);
        self.products.insert_one(&product, None).await?;
        Ok(product)
    }

    async fn replace(&self, product: Product) -> StoreResult<Product> {
        let result = self
            .products
            .replace_one(doc! { "_id": product.id }, &product, None)
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::Backend(format!(
                "Product {} vanished before update",
                product.id
            )));
        }
        Ok(product)
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<()> {
        self.products.delete_one(doc! { "_id": id }, None).await?;
        Ok(())
    }

    async fn search(&self, filter: &ProductFilter, page: PageRequest) -> StoreResult<PageResult<Product>> {
        let query = filter.to_document();

        // Count all matches first so the page envelope has the totals
        let total = self.products.count_documents(query.clone(), None).await?;

        // Fetch one page sorted by name, descending
        let options = FindOptions::builder()
            .sort(doc! { "name": -1 })
            .skip(page.offset())
            .limit(i64::try_from(page.size).unwrap_or(i64::MAX))
            .build();
        let cursor = self.products.find(query, options).await?;
        let items: Vec<Product> = cursor.try_collect().await?;

        Ok(PageResult::new(items, page, total))
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        Ok(self.categories.find_one(doc! { "name": name }, None).await?)
    }

    async fn find_all_categories(&self) -> StoreResult<Vec<Category>> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self.categories.find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }
}
