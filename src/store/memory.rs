use std::cmp::Reverse;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::{StoreError, StoreResult};
use crate::filter::{PageRequest, ProductFilter};
use crate::models::{Category, NewProduct, Product, User};
use crate::response::PageResult;
use crate::store::{CatalogStore, CredentialStore};

#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<Vec<User>>,
}

impl MemoryCredentialStore {
    pub fn with_users(users: Vec<User>) -> Self {
        MemoryCredentialStore {
            users: RwLock::new(users),
        }
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().iter().find(|u| u.username == username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> StoreResult<bool> {
        Ok(self.users.read().iter().any(|u| u.username == username))
    }

    async fn insert(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write();
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(user.username));
        }
        users.push(user.clone());
        Ok(user)
    }
}

/// Catalog kept in a vector; counts writes so tests can assert nothing was persisted.
#[derive(Default)]
pub struct MemoryCatalogStore {
    products: RwLock<Vec<Product>>,
    categories: RwLock<Vec<Category>>,
    next_id: RwLock<i64>,
    writes: AtomicUsize,
}

impl MemoryCatalogStore {
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Self {
        let next_id = products.iter().map(|p| p.id).max().unwrap_or(0);
        MemoryCatalogStore {
            products: RwLock::new(products),
            categories: RwLock::new(categories),
            next_id: RwLock::new(next_id),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<Product> {
        self.products.read().clone()
    }

    fn name_taken(products: &[Product], name: &str, except: Option<i64>) -> bool {
        let wanted = name.to_lowercase();
        products
            .iter()
            .any(|p| Some(p.id) != except && p.name.to_lowercase() == wanted)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn find_all(&self) -> StoreResult<Vec<Product>> {
        Ok(self.products.read().clone())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Product>> {
        Ok(self.products.read().iter().find(|p| p.id == id).cloned())
    }

    async fn exists_by_name_ignore_case(&self, name: &str) -> StoreResult<bool> {
        Ok(Self::name_taken(&self.products.read(), name, None))
    }

    async fn insert(&self, product: NewProduct) -> StoreResult<Product> {
        let mut products = self.products.write();
        if Self::name_taken(&products, &product.name, None) {
            return Err(StoreError::Conflict(product.name));
        }
        let mut next_id = self.next_id.write();
        *next_id += 1;
        let product = product.with_id(*next_id);
        products.push(product.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(product)
    }

    async fn replace(&self, product: Product) -> StoreResult<Product> {
        let mut products = self.products.write();
        if Self::name_taken(&products, &product.name, Some(product.id)) {
            return Err(StoreError::Conflict(product.name));
        }
        let slot = products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| StoreError::Backend(format!("no product {}", product.id)))?;
        *slot = product.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(product)
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<()> {
        self.products.write().retain(|p| p.id != id);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn search(&self, filter: &ProductFilter, page: PageRequest) -> StoreResult<PageResult<Product>> {
        let mut matching: Vec<Product> = self
            .products
            .read()
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        matching.sort_by_key(|p| Reverse(p.name.clone()));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect();
        Ok(PageResult::new(items, page, total))
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        Ok(self.categories.read().iter().find(|c| c.name == name).cloned())
    }

    async fn find_all_categories(&self) -> StoreResult<Vec<Category>> {
        let mut categories = self.categories.read().clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}
