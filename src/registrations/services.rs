use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::RegistrationStats,
    repo::RegistrationStore,
    repo_types::{NewRegistration, Registration, RegistrationStatus},
};
use crate::{db::StoreError, error::ApiError, events::repo_types::EventStatus, pagination::Page};

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Event not found")]
    EventNotFound,
    #[error("Event is not accepting registrations")]
    NotAccepting,
    #[error("Event is full")]
    EventFull,
    #[error("Already registered for this event")]
    AlreadyRegistered,
    #[error("Registration not found")]
    NotFound,
    #[error(transparent)]
    Internal(anyhow::Error),
}

impl From<StoreError> for RegistrationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => RegistrationError::AlreadyRegistered,
            StoreError::Backend(e) => RegistrationError::Internal(e),
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(e: RegistrationError) -> Self {
        match e {
            RegistrationError::EventNotFound | RegistrationError::NotFound => {
                ApiError::NotFound(e.to_string())
            }
            RegistrationError::NotAccepting | RegistrationError::EventFull => {
                ApiError::BadRequest(e.to_string())
            }
            RegistrationError::AlreadyRegistered => ApiError::Conflict(e.to_string()),
            RegistrationError::Internal(e) => ApiError::Internal(e),
        }
    }
}

/// Applies the sign-up rules in order: event exists, is upcoming, has room, and the
/// email is not registered yet. The duplicate pre-check only produces the friendly error;
/// the store's unique index is what holds under concurrent submissions.
pub async fn create_registration(
    store: &dyn RegistrationStore,
    new: NewRegistration,
) -> Result<Registration, RegistrationError> {
    let gate = store
        .event_gate(new.event_id)
        .await?
        .ok_or(RegistrationError::EventNotFound)?;

    if gate.status != EventStatus::Upcoming {
        warn!(event_id = %new.event_id, status = %gate.status, "registration for closed event");
        return Err(RegistrationError::NotAccepting);
    }

    if let Some(max) = gate.max_participants.filter(|m| *m > 0) {
        let taken = store.count_active(new.event_id).await?;
        if taken >= i64::from(max) {
            warn!(event_id = %new.event_id, taken, max, "event is full");
            return Err(RegistrationError::EventFull);
        }
    }

    if store
        .find_by_event_and_email(new.event_id, &new.email)
        .await?
        .is_some()
    {
        warn!(event_id = %new.event_id, "duplicate registration");
        return Err(RegistrationError::AlreadyRegistered);
    }

    let registration = store.insert(new).await.map_err(|e| {
        if matches!(e, StoreError::Duplicate) {
            warn!("duplicate registration rejected by unique index");
        }
        RegistrationError::from(e)
    })?;

    info!(
        registration_id = %registration.id,
        event_id = %registration.event_id,
        "registration created"
    );
    Ok(registration)
}

pub async fn update_status(
    store: &dyn RegistrationStore,
    id: Uuid,
    status: RegistrationStatus,
) -> Result<Registration, RegistrationError> {
    let registration = store
        .update_status(id, status)
        .await?
        .ok_or(RegistrationError::NotFound)?;
    info!(registration_id = %id, status = %status, "registration status updated");
    Ok(registration)
}

pub async fn delete_registration(
    store: &dyn RegistrationStore,
    id: Uuid,
) -> Result<(), RegistrationError> {
    if !store.delete(id).await? {
        return Err(RegistrationError::NotFound);
    }
    info!(registration_id = %id, "registration deleted");
    Ok(())
}

pub async fn list_for_event(
    store: &dyn RegistrationStore,
    event_id: Uuid,
    status: Option<RegistrationStatus>,
    page: Page,
) -> Result<(Vec<Registration>, i64), RegistrationError> {
    Ok(store.list_by_event(event_id, status, page).await?)
}

pub async fn stats_for_event(
    store: &dyn RegistrationStore,
    event_id: Uuid,
) -> Result<RegistrationStats, RegistrationError> {
    let by_status: BTreeMap<_, _> = store.status_counts(event_id).await?.into_iter().collect();
    Ok(RegistrationStats {
        total: by_status.values().sum(),
        by_status,
    })
}
