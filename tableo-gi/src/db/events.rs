//! Event database operations

use crate::models::Event;
use anyhow::Result;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Insert a new event
pub async fn save_event(pool: &SqlitePool, event: &Event) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO events (id, name, event_date)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(event.id.to_string())
    .bind(&event.name)
    .bind(event.event_date.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load an event by id
pub async fn load_event(pool: &SqlitePool, event_id: Uuid) -> Result<Option<Event>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, event_date
        FROM events
        WHERE id = ?
        "#,
    )
    .bind(event_id.to_string())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let id_str: String = row.get("id");
            let date_str: String = row.get("event_date");

            Ok(Some(Event {
                id: Uuid::parse_str(&id_str)?,
                name: row.get("name"),
                event_date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")?,
            }))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        tableo_common::db::init_tables(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_save_and_load_event() {
        let pool = test_pool().await;

        let event = Event {
            id: Uuid::new_v4(),
            name: "Mariage Dupont".to_string(),
            event_date: NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
        };

        save_event(&pool, &event).await.expect("Failed to save event");

        let loaded = load_event(&pool, event.id)
            .await
            .expect("Failed to load event")
            .expect("Event not found");

        assert_eq!(loaded.name, event.name);
        assert_eq!(loaded.event_date, event.event_date);
    }

    #[tokio::test]
    async fn test_load_missing_event() {
        let pool = test_pool().await;
        let loaded = load_event(&pool, Uuid::new_v4()).await.unwrap();
        assert!(loaded.is_none());
    }
}
