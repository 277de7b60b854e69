//! Product search filters.
//!
//! A [`ProductFilter`] is a conjunction of whichever constraints are present;
//! an absent field constrains nothing. The same filter is evaluated in
//! process by [`ProductFilter::matches`] and pushed down to MongoDB by
//! [`ProductFilter::to_document`].

use mongodb::bson::{doc, Document};

use crate::errors::{AppError, AppResult};
use crate::models::Product;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub quantity_min: Option<i64>,
    pub quantity_max: Option<i64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub category_id: Option<i64>,
}

impl ProductFilter {
    /// Price bounds must be finite; NaN compares false in process but sorts
    /// below every number in MongoDB, so the two would disagree.
    pub fn validate(&self) -> AppResult<()> {
        for (label, bound) in [("priceMin", self.price_min), ("priceMax", self.price_max)] {
            if bound.is_some_and(|value| !value.is_finite()) {
                return Err(AppError::Validation(format!("{} must be a finite number", label)));
            }
        }
        Ok(())
    }

    pub fn matches(&self, product: &Product) -> bool {
        let name_ok = self.name.as_deref().map_or(true, |needle| {
            product.name.to_lowercase().contains(&needle.to_lowercase())
        });
        let quantity_ok = self.quantity_min.map_or(true, |min| product.quantity >= min)
            && self.quantity_max.map_or(true, |max| product.quantity <= max);
        let price_ok = self.price_min.map_or(true, |min| product.price >= min)
            && self.price_max.map_or(true, |max| product.price <= max);
        let category_ok = self.category_id.map_or(true, |id| product.category.id == id);

        name_ok && quantity_ok && price_ok && category_ok
    }

    /// MongoDB query document with one clause per present field.
    pub fn to_document(&self) -> Document {
        let mut query = Document::new();

        if let Some(name) = &self.name {
            query.insert("name", doc! { "$regex": regex::escape(name), "$options": "i" });
        }

        let mut quantity = Document::new();
        if let Some(min) = self.quantity_min {
            quantity.insert("$gte", min);
        }
        if let Some(max) = self.quantity_max {
            quantity.insert("$lte", max);
        }
        if !quantity.is_empty() {
            query.insert("quantity", quantity);
        }

        let mut price = Document::new();
        if let Some(min) = self.price_min {
            price.insert("$gte", min);
        }
        if let Some(max) = self.price_max {
            price.insert("$lte", max);
        }
        if !price.is_empty() {
            query.insert("price", price);
        }

        if let Some(category_id) = self.category_id {
            query.insert("category._id", category_id);
        }

        query
    }
}

/// Zero-based page index and page length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> AppResult<Self> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "Page size must be between 1 - {} items",
                MAX_PAGE_SIZE
            )));
        }
        // skip is sent to MongoDB as a signed 64-bit integer
        let fits = page
            .checked_mul(size)
            .is_some_and(|offset| offset <= i64::MAX as u64);
        if !fits {
            return Err(AppError::Validation(format!("Page number {} is out of range", page)));
        }
        Ok(PageRequest { page, size })
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}
