//! Shared helpers for integration tests.
//!
//! Each test gets its own in-memory `SQLite` database with the schema
//! migrations applied. The pool is capped at one connection: every
//! `sqlite::memory:` connection is a separate database.

#![allow(dead_code)]

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use tradepost_core::{ProductModel, Role, Username};
use tradepost_server::db::{self, ProductRepository};
use tradepost_server::models::CurrentUser;
use tradepost_server::models::product::NewProduct;
use tradepost_server::services::UserService;

/// Create a fresh in-memory database with migrations applied.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid connection string")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("failed to create in-memory pool");

    db::MIGRATOR
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

/// Insert a catalog product and return its model key.
pub async fn seed_product(pool: &SqlitePool, model: &str) -> ProductModel {
    let model = ProductModel::parse(model).expect("valid model");

    ProductRepository::new(pool)
        .insert(&NewProduct {
            model: model.clone(),
            category: "Smartphone".to_owned(),
            selling_price: Decimal::new(199_99, 2),
            arrival_date: NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"),
            quantity: 10,
            details: None,
        })
        .await
        .expect("failed to seed product");

    model
}

/// Register an account through the service and return it as a session actor.
pub async fn seed_user(pool: &SqlitePool, username: &str, role: Role) -> CurrentUser {
    let username = Username::parse(username).expect("valid username");

    UserService::new(pool)
        .create_user(
            username.clone(),
            "Test".to_owned(),
            "User".to_owned(),
            "s3cure-enough!",
            role,
        )
        .await
        .expect("failed to seed user");

    CurrentUser { username, role }
}
