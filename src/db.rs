use mongodb::bson::Document;
use mongodb::options::{ClientOptions, Collation, CollationStrength, IndexOptions};
use mongodb::{Client, Database, IndexModel};

use crate::config::Config;
use crate::models::{Category, Product, User};
use crate::store::mongo::{CATEGORIES, PRODUCTS, USERS};

pub async fn connect(config: &Config) -> mongodb::error::Result<Database> {
    let client_options = ClientOptions::parse(&config.database_url).await?;
    let client = Client::with_options(client_options)?;
    Ok(client.database(&config.database_name))
}

fn unique_on(field: &str, collation: Option<Collation>) -> IndexModel {
    let mut keys = Document::new();
    keys.insert(field, 1);

    let options = IndexOptions::builder().unique(true).collation(collation).build();
    IndexModel::builder().keys(keys).options(options).build()
}

/// Unique indexes backing the service-level uniqueness checks.
///
/// `products.name` uses a strength-2 collation so "Laptop" and "laptop"
/// collide, which closes the race between the duplicate check and the insert.
pub async fn ensure_indexes(db: &Database) -> mongodb::error::Result<()> {
    let case_insensitive = Collation::builder()
        .locale("en".to_string())
        .strength(CollationStrength::Secondary)
        .build();

    db.collection::<User>(USERS)
        .create_index(unique_on("username", None), None)
        .await?;
    db.collection::<Category>(CATEGORIES)
        .create_index(unique_on("name", None), None)
        .await?;
    db.collection::<Product>(PRODUCTS)
        .create_index(unique_on("name", Some(case_insensitive)), None)
        .await?;

    log::info!("Indexes ensured on {}", db.name());
    Ok(())
}
