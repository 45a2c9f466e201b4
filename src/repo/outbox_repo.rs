use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub event_id: i64,
    pub donation_id: Uuid,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub attempts: i32,
}

#[derive(Clone)]
pub struct OutboxRepo {
    pub pool: PgPool,
}

impl OutboxRepo {
    /// Written inside the settlement transaction so the event exists iff the
    /// settlement committed. The (donation, event_type) key keeps a retried
    /// settlement from enqueueing twice.
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        donation_id: Uuid,
        event_type: &str,
        payload: serde_json::Value,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO donation_events_outbox (donation_id, event_type, payload, status, attempts, next_attempt_at)
            VALUES ($1, $2, $3, 'PENDING', 0, now())
            ON CONFLICT (donation_id, event_type) DO NOTHING
            "#,
        )
        .bind(donation_id)
        .bind(event_type)
        .bind(payload)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    pub async fn lock_pending(&self, batch_size: i64) -> Result<Vec<OutboxEvent>> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query(
            r#"
            SELECT event_id, donation_id, event_type, payload, attempts
            FROM donation_events_outbox
            WHERE status = 'PENDING' AND next_attempt_at <= now()
            ORDER BY event_id ASC
            LIMIT $1
            FOR UPDATE SKIP LOCKED
            "#,
        )
        .bind(batch_size)
        .fetch_all(tx.as_mut())
        .await?;

        if rows.is_empty() {
            tx.rollback().await?;
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.get("event_id")).collect();
        sqlx::query("UPDATE donation_events_outbox SET status = 'PROCESSING', updated_at = now() WHERE event_id = ANY($1)")
            .bind(&ids)
            .execute(tx.as_mut())
            .await?;

        tx.commit().await?;

        Ok(rows
            .into_iter()
            .map(|r| OutboxEvent {
                event_id: r.get("event_id"),
                donation_id: r.get("donation_id"),
                event_type: r.get("event_type"),
                payload: r.get("payload"),
                attempts: r.get("attempts"),
            })
            .collect())
    }

    pub async fn mark_published(&self, event_id: i64) -> Result<()> {
        sqlx::query(
            "UPDATE donation_events_outbox SET status = 'PUBLISHED', published_at = now(), updated_at = now() WHERE event_id = $1",
        )
        .bind(event_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn mark_retry(&self, event_id: i64, attempts: i32, next_attempt_at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            "UPDATE donation_events_outbox SET status = 'PENDING', attempts = $2, next_attempt_at = $3, updated_at = now() WHERE event_id = $1",
        )
        .bind(event_id)
        .bind(attempts)
        .bind(next_attempt_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
