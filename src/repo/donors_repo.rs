use anyhow::Result;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DonorRecord {
    pub donor_id: Uuid,
    pub name: String,
    pub points: i64,
}

#[derive(Clone)]
pub struct DonorsRepo {
    pub pool: PgPool,
}

impl DonorsRepo {
    pub async fn get(&self, donor_id: Uuid) -> Result<Option<DonorRecord>> {
        let row = sqlx::query("SELECT donor_id, name, points FROM donors WHERE donor_id = $1")
            .bind(donor_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| DonorRecord {
            donor_id: r.get("donor_id"),
            name: r.get("name"),
            points: r.get("points"),
        }))
    }

    /// In-SQL increment; returns the post-increment total the level is
    /// derived from, or None when no such donor exists.
    pub async fn add_points_tx(
        tx: &mut Transaction<'_, Postgres>,
        donor_id: Uuid,
        points: i64,
    ) -> Result<Option<i64>> {
        let row = sqlx::query("UPDATE donors SET points = points + $2 WHERE donor_id = $1 RETURNING points")
            .bind(donor_id)
            .bind(points)
            .fetch_optional(tx.as_mut())
            .await?;

        Ok(row.map(|r| r.get("points")))
    }

    pub async fn set_level_tx(
        tx: &mut Transaction<'_, Postgres>,
        donor_id: Uuid,
        level: &str,
    ) -> Result<()> {
        sqlx::query("UPDATE donors SET level = $2 WHERE donor_id = $1")
            .bind(donor_id)
            .bind(level)
            .execute(tx.as_mut())
            .await?;

        Ok(())
    }
}
