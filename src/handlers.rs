use actix_web::{error, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::auth::AuthService;
use crate::errors::{AppError, AppResult};
use crate::filter::{PageRequest, ProductFilter, DEFAULT_PAGE_SIZE};
use crate::models::{CategoryResponse, LoginRequest, ProductRequest, ProductResponse, RegisterRequest};
use crate::products::ProductService;
use crate::response::ApiResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub name: Option<String>,
    pub quantity_min: Option<i64>,
    pub quantity_max: Option<i64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub category_id: Option<i64>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl SearchParams {
    fn into_parts(self) -> AppResult<(ProductFilter, PageRequest)> {
        let page = PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?;
        let filter = ProductFilter {
            name: self.name,
            quantity_min: self.quantity_min,
            quantity_max: self.quantity_max,
            price_min: self.price_min,
            price_max: self.price_max,
            category_id: self.category_id,
        };
        filter.validate()?;
        Ok((filter, page))
    }
}

async fn login(auth: web::Data<AuthService>, body: web::Json<LoginRequest>) -> AppResult<HttpResponse> {
    body.validate()?;
    let result = auth.authenticate(&body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}

async fn register(auth: web::Data<AuthService>, body: web::Json<RegisterRequest>) -> AppResult<HttpResponse> {
    body.validate()?;
    let user = auth.register(&body).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(user)))
}

async fn get_all(products: web::Data<ProductService>) -> AppResult<HttpResponse> {
    let list: Vec<ProductResponse> = products
        .get_all()
        .await?
        .into_iter()
        .map(ProductResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

async fn search(products: web::Data<ProductService>, params: web::Query<SearchParams>) -> AppResult<HttpResponse> {
    let (filter, page) = params.into_inner().into_parts()?;
    let result = products.search(&filter, page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(result.map(ProductResponse::from))))
}

async fn get_by_id(products: web::Data<ProductService>, id: web::Path<i64>) -> AppResult<HttpResponse> {
    let product = products.get_by_id(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(ProductResponse::from(product))))
}

async fn create(products: web::Data<ProductService>, body: web::Json<ProductRequest>) -> AppResult<HttpResponse> {
    body.validate()?;
    let product = products.create(&body).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(ProductResponse::from(product))))
}

async fn update(
    products: web::Data<ProductService>,
    id: web::Path<i64>,
    body: web::Json<ProductRequest>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let product = products.update(id.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(ProductResponse::from(product))))
}

async fn delete(products: web::Data<ProductService>, id: web::Path<i64>) -> AppResult<HttpResponse> {
    products.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::empty()))
}

async fn categories(products: web::Data<ProductService>) -> AppResult<HttpResponse> {
    let list: Vec<CategoryResponse> = products
        .categories()
        .await?
        .into_iter()
        .map(CategoryResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

fn bad_request(err: impl std::fmt::Display, _req: &HttpRequest) -> error::Error {
    AppError::Validation(err.to_string()).into()
}

/// Extractor configs that render malformed bodies, queries and paths as envelopes.
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| bad_request(err, req)))
        .app_data(web::QueryConfig::default().error_handler(|err, req| bad_request(err, req)))
        .app_data(web::PathConfig::default().error_handler(|err, req| bad_request(err, req)));
}

/// Public login and registration routes, mounted under `/api/auth`.
pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login))
        .route("/register", web::post().to(register));
}

/// Catalog routes, mounted under `/api` behind the bearer middleware.
pub fn catalog_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/products")
            .route(web::get().to(get_all))
            .route(web::post().to(create)),
    )
    // registered before /products/{id} so "search" is not parsed as an id
    .route("/products/search", web::get().to(search))
    .service(
        web::resource("/products/{id}")
            .route(web::get().to(get_by_id))
            .route(web::put().to(update))
            .route(web::delete().to(delete)),
    )
    .route("/categories", web::get().to(categories));
}
