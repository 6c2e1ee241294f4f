//! Guest database operations
//!
//! The name index for an event is read once per import and extended in
//! memory by the duplicate resolver; batch inserts are one multi-row
//! statement per chunk.

use crate::models::{GuestRecord, NormalizedGuest};
use anyhow::Result;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

/// Load the existing guest-name index for an event
pub async fn load_guest_names(pool: &SqlitePool, event_id: Uuid) -> Result<Vec<String>> {
    let rows = sqlx::query(
        r#"
        SELECT guest_name
        FROM guests
        WHERE event_id = ?
        "#,
    )
    .bind(event_id.to_string())
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get("guest_name")).collect())
}

/// Insert one chunk of guests as a single multi-row statement
///
/// The caller owns chunking and ordering; this function is one durability
/// checkpoint.
pub async fn insert_guests(
    pool: &SqlitePool,
    event_id: Uuid,
    guests: &[NormalizedGuest],
) -> Result<(), sqlx::Error> {
    if guests.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO guests (id, event_id, guest_name, table_number, seat_number) ");

    builder.push_values(guests, |mut b, guest| {
        b.push_bind(Uuid::new_v4().to_string())
            .push_bind(event_id.to_string())
            .push_bind(&guest.guest_name)
            .push_bind(&guest.table_number)
            .push_bind(&guest.seat_number);
    });

    builder.build().execute(pool).await?;

    Ok(())
}

/// Insert a single guest, returning its record
pub async fn insert_guest(
    pool: &SqlitePool,
    event_id: Uuid,
    guest: &NormalizedGuest,
) -> Result<GuestRecord> {
    let record = GuestRecord {
        id: Uuid::new_v4(),
        event_id,
        guest_name: guest.guest_name.clone(),
        table_number: guest.table_number.clone(),
        seat_number: guest.seat_number.clone(),
    };

    sqlx::query(
        r#"
        INSERT INTO guests (id, event_id, guest_name, table_number, seat_number)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(record.event_id.to_string())
    .bind(&record.guest_name)
    .bind(&record.table_number)
    .bind(&record.seat_number)
    .execute(pool)
    .await?;

    Ok(record)
}

/// List an event's guests ordered by table then seat
pub async fn list_guests(pool: &SqlitePool, event_id: Uuid) -> Result<Vec<GuestRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, event_id, guest_name, table_number, seat_number
        FROM guests
        WHERE event_id = ?
        ORDER BY table_number ASC, seat_number ASC
        "#,
    )
    .bind(event_id.to_string())
    .fetch_all(pool)
    .await?;

    let mut guests = Vec::with_capacity(rows.len());
    for row in rows {
        let id_str: String = row.get("id");
        let event_id_str: String = row.get("event_id");

        guests.push(GuestRecord {
            id: Uuid::parse_str(&id_str)?,
            event_id: Uuid::parse_str(&event_id_str)?,
            guest_name: row.get("guest_name"),
            table_number: row.get("table_number"),
            seat_number: row.get("seat_number"),
        });
    }

    Ok(guests)
}

/// Count guests for an event
pub async fn count_guests(pool: &SqlitePool, event_id: Uuid) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guests WHERE event_id = ?")
        .bind(event_id.to_string())
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Delete one guest scoped to its event; returns whether a row was removed
pub async fn delete_guest(pool: &SqlitePool, event_id: Uuid, guest_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM guests WHERE id = ? AND event_id = ?")
        .bind(guest_id.to_string())
        .bind(event_id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
