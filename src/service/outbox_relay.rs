use crate::repo::outbox_repo::OutboxRepo;
use anyhow::Result;
use chrono::{Duration, Utc};

/// Drains the settlement outbox into a capped Redis stream. Consumers
/// (dashboards, notification senders) read the stream; failures here never
/// touch donation state, the event just retries with backoff.
#[derive(Clone)]
pub struct OutboxRelay {
    pub outbox_repo: OutboxRepo,
    pub redis_client: redis::Client,
    pub stream_key: String,
}

impl OutboxRelay {
    pub async fn run(self) {
        loop {
            if let Err(err) = self.tick().await {
                tracing::error!("outbox relay error: {}", err);
            }
            tokio::time::sleep(std::time::Duration::from_millis(250)).await;
        }
    }

    async fn tick(&self) -> Result<()> {
        let batch = self.outbox_repo.lock_pending(64).await?;
        if batch.is_empty() {
            return Ok(());
        }

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        for event in batch {
            let body = serde_json::json!({
                "event_type": event.event_type,
                "donation_id": event.donation_id,
                "payload": event.payload,
            });
            let add_res: redis::RedisResult<String> = redis::cmd("XADD")
                .arg(&self.stream_key)
                .arg("MAXLEN")
                .arg("~")
                .arg(500_000)
                .arg("*")
                .arg("event")
                .arg(body.to_string())
                .query_async(&mut conn)
                .await;

            match add_res {
                Ok(_) => {
                    self.outbox_repo.mark_published(event.event_id).await?;
                }
                Err(e) => {
                    let attempts = event.attempts + 1;
                    let backoff = i64::min(300, 2_i64.pow(attempts.min(8) as u32));
                    let next_attempt_at = Utc::now() + Duration::seconds(backoff);
                    self.outbox_repo
                        .mark_retry(event.event_id, attempts, next_attempt_at)
                        .await?;
                    tracing::warn!("xadd failed for outbox event {}: {}", event.event_id, e);
                }
            }
        }

        Ok(())
    }
}
