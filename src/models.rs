use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub password: String, // argon2 encoded hash
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub category: Category,
}

/// A product that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub category: Category,
}

impl NewProduct {
    pub fn with_id(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            quantity: self.quantity,
            price: self.price,
            category: self.category,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub id: String,
    pub seq: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // Subject (user ID)
    pub username: String,
    pub exp: usize,       // Expiration time as UTC timestamp
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.username.trim().is_empty() {
            return Err(AppError::Validation("Username is required".to_string()));
        }
        if self.password.trim().is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.username.trim().is_empty() {
            return Err(AppError::Validation("Username is required".to_string()));
        }
        let username_len = self.username.chars().count();
        if !(3..=50).contains(&username_len) {
            return Err(AppError::Validation(
                "Username must be between 3 - 50 characters".to_string(),
            ));
        }
        let password_len = self.password.chars().count();
        if !(6..=100).contains(&password_len) {
            return Err(AppError::Validation(
                "Password must be between 6 - 100 characters".to_string(),
            ));
        }
        if self.password != self.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }
        Ok(())
    }
}

/// Outcome of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResult {
    #[serde(rename = "isSuccess")]
    pub success: bool,
    pub message: String,
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub category_name: String,
}

impl ProductRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Product name is required".to_string()));
        }
        if self.quantity < 0 {
            return Err(AppError::Validation("Quantity must not be negative".to_string()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::Validation("Price must not be negative".to_string()));
        }
        if self.category_name.trim().is_empty() {
            return Err(AppError::Validation("Category name is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub category_name: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            id: product.id,
            name: product.name,
            quantity: product.quantity,
            price: product.price,
            category_name: product.category.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        CategoryResponse {
            id: category.id,
            name: category.name,
        }
    }
}
