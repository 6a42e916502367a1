use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{
    EventGate, NewRegistration, Registration, RegistrationRow, RegistrationStatus,
};
use crate::{
    db::{PgStore, StoreError},
    pagination::Page,
};

/// Persistence of event sign-ups.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn event_gate(&self, event_id: Uuid) -> Result<Option<EventGate>, StoreError>;

    /// Registrations for the event that are not `Cancelled`.
    async fn count_active(&self, event_id: Uuid) -> Result<i64, StoreError>;

    async fn find_by_event_and_email(
        &self,
        event_id: Uuid,
        email: &str,
    ) -> Result<Option<Registration>, StoreError>;

    /// Inserts as `Pending`. A second row for the same `(event, email)` fails with
    /// `StoreError::Duplicate` no matter how the calls interleave.
    async fn insert(&self, registration: NewRegistration) -> Result<Registration, StoreError>;

    async fn update_status(
        &self,
        id: Uuid,
        status: RegistrationStatus,
    ) -> Result<Option<Registration>, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Newest first, with the total matching the filter.
    async fn list_by_event(
        &self,
        event_id: Uuid,
        status: Option<RegistrationStatus>,
        page: Page,
    ) -> Result<(Vec<Registration>, i64), StoreError>;

    async fn status_counts(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<(RegistrationStatus, i64)>, StoreError>;
}

const REGISTRATION_COLUMNS: &str = "id, event_id, name, email, phone, college, linkedin_url, \
                                    food_preference, status, registered_at, created_at, updated_at";

fn into_registration(row: RegistrationRow) -> Result<Registration, StoreError> {
    Ok(Registration::try_from(row)?)
}

#[async_trait]
impl RegistrationStore for PgStore {
    async fn event_gate(&self, event_id: Uuid) -> Result<Option<EventGate>, StoreError> {
        let row = sqlx::query_as::<_, (String, Option<i32>)>(
            "SELECT status, max_participants FROM events WHERE id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.db)
        .await?;
        row.map(|(status, max_participants)| {
            Ok::<_, StoreError>(EventGate {
                status: status.parse()?,
                max_participants,
            })
        })
        .transpose()
    }

    async fn count_active(&self, event_id: Uuid) -> Result<i64, StoreError> {
        let (count,) = sqlx::query_as::<_, (i64,)>(
            r#"
            SELECT COUNT(*)
              FROM registrations
             WHERE event_id = $1 AND status <> 'Cancelled'
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }

    async fn find_by_event_and_email(
        &self,
        event_id: Uuid,
        email: &str,
    ) -> Result<Option<Registration>, StoreError> {
        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE event_id = $1 AND email = $2"
        ))
        .bind(event_id)
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        row.map(into_registration).transpose()
    }

    async fn insert(&self, r: NewRegistration) -> Result<Registration, StoreError> {
        // uq_registrations_event_email backs the duplicate rule
        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            r#"
            INSERT INTO registrations
                (event_id, name, email, phone, college, linkedin_url, food_preference)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(r.event_id)
        .bind(&r.name)
        .bind(&r.email)
        .bind(&r.phone)
        .bind(&r.college)
        .bind(&r.linkedin_url)
        .bind(r.food_preference.map(|f| f.as_str()))
        .fetch_one(&self.db)
        .await?;
        into_registration(row)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: RegistrationStatus,
    ) -> Result<Option<Registration>, StoreError> {
        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            r#"
            UPDATE registrations
               SET status = $2, updated_at = now()
             WHERE id = $1
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.db)
        .await?;
        row.map(into_registration).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_by_event(
        &self,
        event_id: Uuid,
        status: Option<RegistrationStatus>,
        page: Page,
    ) -> Result<(Vec<Registration>, i64), StoreError> {
        let status = status.map(|s| s.as_str());
        let (total,) = sqlx::query_as::<_, (i64,)>(
            r#"
            SELECT COUNT(*)
              FROM registrations
             WHERE event_id = $1 AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(event_id)
        .bind(status)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, RegistrationRow>(&format!(
            r#"
            SELECT {REGISTRATION_COLUMNS}
              FROM registrations
             WHERE event_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY registered_at DESC
             LIMIT $3 OFFSET $4
            "#
        ))
        .bind(event_id)
        .bind(status)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        let items = rows
            .into_iter()
            .map(into_registration)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total))
    }

    async fn status_counts(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<(RegistrationStatus, i64)>, StoreError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT status, COUNT(*)
              FROM registrations
             WHERE event_id = $1
             GROUP BY status
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.db)
        .await?;
        rows.into_iter()
            .map(|(status, count)| {
                Ok::<_, StoreError>((status.parse::<RegistrationStatus>()?, count))
            })
            .collect()
    }
}
