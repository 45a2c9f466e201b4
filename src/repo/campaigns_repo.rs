use anyhow::Result;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Debug, Clone, serde::Serialize)]
pub struct Campaign {
    pub campaign_id: Uuid,
    pub title: String,
    pub goal_amount: i64,
    pub raised_amount: i64,
}

#[derive(Clone)]
pub struct CampaignsRepo {
    pub pool: PgPool,
}

impl CampaignsRepo {
    pub async fn get(&self, campaign_id: Uuid) -> Result<Option<Campaign>> {
        let row = sqlx::query(
            "SELECT campaign_id, title, goal_amount, raised_amount FROM campaigns WHERE campaign_id = $1",
        )
        .bind(campaign_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Campaign {
            campaign_id: r.get("campaign_id"),
            title: r.get("title"),
            goal_amount: r.get("goal_amount"),
            raised_amount: r.get("raised_amount"),
        }))
    }

    /// The only writer of `raised_amount`. In-SQL increment, no
    /// read-modify-write window.
    pub async fn add_to_raised_tx(
        tx: &mut Transaction<'_, Postgres>,
        campaign_id: Uuid,
        amount: i64,
    ) -> Result<()> {
        sqlx::query("UPDATE campaigns SET raised_amount = raised_amount + $2 WHERE campaign_id = $1")
            .bind(campaign_id)
            .bind(amount)
            .execute(tx.as_mut())
            .await?;

        Ok(())
    }
}
