use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::filter::{PageRequest, ProductFilter};
use crate::models::{Category, NewProduct, Product, ProductRequest};
use crate::response::PageResult;
use crate::store::CatalogStore;

pub struct ProductService {
    store: Arc<dyn CatalogStore>,
}

fn product_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Product not found with id: {}", id))
}

impl ProductService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        ProductService { store }
    }

    pub async fn get_all(&self) -> AppResult<Vec<Product>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Product> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| product_not_found(id))
    }

    pub async fn create(&self, req: &ProductRequest) -> AppResult<Product> {
        // Names are unique regardless of case
        if self.store.exists_by_name_ignore_case(&req.name).await? {
            return Err(AppError::DuplicateName("Product name already exists".to_string()));
        }
        let category = self.resolve_category(&req.category_name).await?;

        // Store assigns the id
        let product = self
            .store
            .insert(NewProduct {
                name: req.name.clone(),
                quantity: req.quantity,
                price: req.price,
                category,
            })
            .await?;
        log::info!("Created product {} ({})", product.id, product.name);
        Ok(product)
    }

    pub async fn update(&self, id: i64, req: &ProductRequest) -> AppResult<Product> {
        // Fetch the existing product
        let mut current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| product_not_found(id))?;

        // A case-only rename of the same product is not a collision.
        let renamed = current.name.to_lowercase() != req.name.to_lowercase();
        if renamed && self.store.exists_by_name_ignore_case(&req.name).await? {
            return Err(AppError::DuplicateName("Product name already exists".to_string()));
        }
        let category = self.resolve_category(&req.category_name).await?;

        // Overwrite every mutable field, keep the id
        current.name = req.name.clone();
        current.category = category;
        current.price = req.price;
        current.quantity = req.quantity;

        let product = self.store.replace(current).await?;
        log::info!("Updated product {} ({})", product.id, product.name);
        Ok(product)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        // Check the product exists before deleting
        if self.store.find_by_id(id).await?.is_none() {
            return Err(product_not_found(id));
        }
        self.store.delete_by_id(id).await?;
        log::info!("Deleted product {}", id);
        Ok(())
    }

    pub async fn search(&self, filter: &ProductFilter, page: PageRequest) -> AppResult<PageResult<Product>> {
        Ok(self.store.search(filter, page).await?)
    }

    pub async fn categories(&self) -> AppResult<Vec<Category>> {
        Ok(self.store.find_all_categories().await?)
    }

    async fn resolve_category(&self, name: &str) -> AppResult<Category> {
        self.store
            .find_category_by_name(name)
            .await?
            .ok_or_else(|| AppError::CategoryNotFound(format!("Category not found with name: {}", name)))
    }
}
