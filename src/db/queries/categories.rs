use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::placeholders;
use crate::db::DbPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub label: String,
}

pub async fn get_all_categories(pool: &DbPool) -> sqlx::Result<Vec<Category>> {
    with_pool!(pool, conn => {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, type FROM category ORDER BY id
            "#,
        )
        .fetch_all(conn)
        .await
    })
}

pub async fn get_category(pool: &DbPool, id: i32) -> sqlx::Result<Option<Category>> {
    with_pool!(pool, conn => {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, type FROM category WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    })
}

/// Labels for the given category ids in one round trip. Ids without a
/// matching row are simply absent from the map.
pub async fn get_category_labels(
    pool: &DbPool,
    ids: impl IntoIterator<Item = i32>,
) -> sqlx::Result<BTreeMap<i32, String>> {
    let ids: Vec<i32> = ids.into_iter().unique().collect();
    if ids.is_empty() {
        return Ok(BTreeMap::new());
    }
    let sql = format!(
        "SELECT id, type FROM category WHERE id IN ({})",
        placeholders(ids.len())
    );

    let categories = with_pool!(pool, conn => {
        let mut query = sqlx::query_as::<_, Category>(&sql);
        for id in &ids {
            query = query.bind(*id);
        }
        query.fetch_all(conn).await
    })?;

    Ok(categories.into_iter().map(|c| (c.id, c.label)).collect())
}

pub async fn import_categories(pool: &DbPool, categories: Vec<Category>) -> sqlx::Result<()> {
    for category in categories {
        with_pool!(pool, conn => {
            sqlx::query(
                r#"
                INSERT INTO category (id, type) VALUES ($1, $2)
                "#,
            )
            .bind(category.id)
            .bind(&category.label)
            .execute(conn)
            .await
            .map(|_| ())
        })?;
    }
    if let DbPool::Postgres(conn) = pool {
        sqlx::query(
            r#"
            SELECT setval(pg_get_serial_sequence('category', 'id'), (SELECT COALESCE(MAX(id), 1) FROM category))
            "#,
        )
        .execute(conn)
        .await?;
    }
    Ok(())
}
