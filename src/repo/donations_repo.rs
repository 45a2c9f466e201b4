use crate::domain::donation::{Donation, DonationStatus};
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

pub struct NewDonation {
    pub donation_id: Uuid,
    pub campaign_id: Uuid,
    pub donor_id: Option<Uuid>,
    pub anonymous: bool,
    pub amount: i64,
    pub currency: String,
    pub gateway: String,
}

#[derive(Clone)]
pub struct DonationsRepo {
    pub pool: PgPool,
}

const DONATION_COLUMNS: &str = "donation_id, campaign_id, donor_id, anonymous, amount, currency, gateway, status, provider_payment_ref, provider_transaction_id, created_at, settled_at";

fn row_to_donation(row: &PgRow) -> Donation {
    let status: String = row.get("status");
    Donation {
        donation_id: row.get("donation_id"),
        campaign_id: row.get("campaign_id"),
        donor_id: row.get("donor_id"),
        anonymous: row.get("anonymous"),
        amount: row.get("amount"),
        currency: row.get("currency"),
        gateway: row.get("gateway"),
        status: DonationStatus::from_db_str(&status),
        provider_payment_ref: row.get("provider_payment_ref"),
        provider_transaction_id: row.get("provider_transaction_id"),
        created_at: row.get("created_at"),
        settled_at: row.get("settled_at"),
    }
}

impl DonationsRepo {
    pub async fn insert_pending(&self, data: &NewDonation) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO donations (donation_id, campaign_id, donor_id, anonymous, amount, currency, gateway, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'PENDING')
            "#,
        )
        .bind(data.donation_id)
        .bind(data.campaign_id)
        .bind(data.donor_id)
        .bind(data.anonymous)
        .bind(data.amount)
        .bind(data.currency.clone())
        .bind(data.gateway.clone())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_provider_ref(&self, donation_id: Uuid, provider_ref: &str) -> Result<()> {
        sqlx::query("UPDATE donations SET provider_payment_ref = $2 WHERE donation_id = $1")
            .bind(donation_id)
            .bind(provider_ref)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get(&self, donation_id: Uuid) -> Result<Option<Donation>> {
        let row = sqlx::query(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE donation_id = $1"
        ))
        .bind(donation_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_donation(&r)))
    }

    pub async fn find_by_provider_ref(&self, gateway: &str, provider_ref: &str) -> Result<Option<Donation>> {
        let row = sqlx::query(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE gateway = $1 AND provider_payment_ref = $2"
        ))
        .bind(gateway)
        .bind(provider_ref)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_donation(&r)))
    }

    /// Row lock for the settlement transaction. Concurrent callbacks for the
    /// same donation queue here; whoever loses the race sees a non-pending
    /// status and applies nothing.
    pub async fn lock_for_settlement(
        tx: &mut Transaction<'_, Postgres>,
        donation_id: Uuid,
    ) -> Result<Option<Donation>> {
        let row = sqlx::query(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE donation_id = $1 FOR UPDATE"
        ))
        .bind(donation_id)
        .fetch_optional(tx.as_mut())
        .await?;

        Ok(row.map(|r| row_to_donation(&r)))
    }

    pub async fn mark_settled_tx(
        tx: &mut Transaction<'_, Postgres>,
        donation_id: Uuid,
        status: DonationStatus,
        provider_transaction_id: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE donations
            SET status = $2,
                provider_transaction_id = COALESCE($3, provider_transaction_id),
                settled_at = now()
            WHERE donation_id = $1
            "#,
        )
        .bind(donation_id)
        .bind(status.as_db_str())
        .bind(provider_transaction_id)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }
}
