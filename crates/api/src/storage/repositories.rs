// Database repository implementation

use anyhow::Result;
use chrono::Utc;
use memorylane_core::{EventUpdate, NewTimelineEvent};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::EventRow;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Apply pending migrations from `crates/api/migrations`
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: NewTimelineEvent) -> Result<EventRow> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (id, timeline_id, title, description, date, media, privacy, suggested, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING id, timeline_id, title, description, date, media, privacy, suggested, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.timeline_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.date)
        .bind(Json(&input.media))
        .bind(input.privacy.as_str())
        .bind(input.suggested)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, timeline_id, title, description, date, media, privacy, suggested, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_events(&self, timeline_id: &str) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, timeline_id, title, description, date, media, privacy, suggested, created_at, updated_at
            FROM events
            WHERE timeline_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(timeline_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_event(&self, id: Uuid, update: EventUpdate) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            UPDATE events
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                privacy = COALESCE($5, privacy),
                updated_at = $6
            WHERE id = $1
            RETURNING id, timeline_id, title, description, date, media, privacy, suggested, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.date)
        .bind(update.privacy.map(|p| p.as_str()))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
