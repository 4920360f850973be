use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Inventory record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Goods {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating new goods
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGoods {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: String,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGoods {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub category: Option<String>,
}

impl Goods {
    pub async fn create(input: CreateGoods, pool: &PgPool) -> Result<Self> {
        let goods = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO goods (name, description, price, stock, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(input.name)
        .bind(input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category)
        .fetch_one(pool)
        .await?;
        Ok(goods)
    }

    /// Page through goods in id order
    pub async fn find_all(skip: i64, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let goods = sqlx::query_as::<_, Self>(
            "SELECT * FROM goods ORDER BY id ASC OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(goods)
    }

    pub async fn find_by_id(id: i32, pool: &PgPool) -> Result<Option<Self>> {
        let goods = sqlx::query_as::<_, Self>("SELECT * FROM goods WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(goods)
    }

    /// Apply the provided fields; `None` when no row has this id
    pub async fn update(id: i32, input: UpdateGoods, pool: &PgPool) -> Result<Option<Self>> {
        let goods = sqlx::query_as::<_, Self>(
            r#"
            UPDATE goods
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                stock = COALESCE($5, stock),
                category = COALESCE($6, category)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category)
        .fetch_optional(pool)
        .await?;
        Ok(goods)
    }

    /// Returns false when no row had this id
    pub async fn delete(id: i32, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM goods WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
