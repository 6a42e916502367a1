//! In-memory stores for unit tests.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{
        password::PasswordDigest,
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    db::StoreError,
    pagination::Page,
    registrations::{
        repo::RegistrationStore,
        repo_types::{EventGate, NewRegistration, Registration, RegistrationStatus},
    },
};

/// Enforces the same uniqueness rules as the Postgres schema, under one lock.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    events: Mutex<Vec<(Uuid, EventGate)>>,
    registrations: Mutex<Vec<Registration>>,
    hide_registrations: AtomicBool,
}

impl MemoryStore {
    pub async fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn add_event(&self, gate: EventGate) -> Uuid {
        let id = Uuid::new_v4();
        self.events.lock().unwrap().push((id, gate));
        id
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.lock().unwrap().len()
    }

    /// Makes `find_by_event_and_email` miss, like a concurrent insert that
    /// committed right after the lookup.
    pub fn hide_existing_registrations(&self, hide: bool) {
        self.hide_registrations.store(hide, Ordering::SeqCst);
    }

    fn with_user<T>(&self, id: Uuid, f: impl FnOnce(&mut User) -> T) -> Option<T> {
        self.users
            .lock()
            .unwrap()
            .iter_mut()
            .find(|u| u.id == id)
            .map(f)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.with_user(id, |u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Duplicate);
        }
        let now = OffsetDateTime::now_utc();
        let stored = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            role: user.role,
            avatar: None,
            password_hash: user.password_hash,
            refresh_token: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        users.push(stored.clone());
        Ok(stored)
    }

    async fn record_login(
        &self,
        id: Uuid,
        at: OffsetDateTime,
        refresh_token: &str,
    ) -> Result<(), StoreError> {
        self.with_user(id, |u| {
            u.last_login = Some(at);
            u.refresh_token = Some(refresh_token.to_string());
        });
        Ok(())
    }

    async fn clear_refresh_token(&self, id: Uuid) -> Result<(), StoreError> {
        self.with_user(id, |u| u.refresh_token = None);
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.lock().unwrap();
        if let Some(email) = email {
            if users
                .iter()
                .any(|u| u.id != id && u.email.eq_ignore_ascii_case(email))
            {
                return Err(StoreError::Duplicate);
            }
        }
        Ok(users.iter_mut().find(|u| u.id == id).map(|u| {
            if let Some(name) = name {
                u.name = name.to_string();
            }
            if let Some(email) = email {
                u.email = email.to_string();
            }
            u.updated_at = OffsetDateTime::now_utc();
            u.clone()
        }))
    }

    async fn update_password(&self, id: Uuid, hash: &PasswordDigest) -> Result<(), StoreError> {
        self.with_user(id, |u| {
            u.password_hash = hash.clone();
            u.refresh_token = None;
        });
        Ok(())
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn event_gate(&self, event_id: Uuid) -> Result<Option<EventGate>, StoreError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| *id == event_id)
            .map(|(_, gate)| *gate))
    }

    async fn count_active(&self, event_id: Uuid) -> Result<i64, StoreError> {
        let count = self
            .registrations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.event_id == event_id && r.status != RegistrationStatus::Cancelled)
            .count();
        Ok(count as i64)
    }

    async fn find_by_event_and_email(
        &self,
        event_id: Uuid,
        email: &str,
    ) -> Result<Option<Registration>, StoreError> {
        if self.hide_registrations.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self
            .registrations
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.event_id == event_id && r.email == email)
            .cloned())
    }

    async fn insert(&self, new: NewRegistration) -> Result<Registration, StoreError> {
        let mut registrations = self.registrations.lock().unwrap();
        if registrations
            .iter()
            .any(|r| r.event_id == new.event_id && r.email == new.email)
        {
            return Err(StoreError::Duplicate);
        }
        let now = OffsetDateTime::now_utc();
        let stored = Registration {
            id: Uuid::new_v4(),
            event_id: new.event_id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            college: new.college,
            linkedin_url: new.linkedin_url,
            food_preference: new.food_preference,
            status: RegistrationStatus::Pending,
            registered_at: now,
            created_at: now,
            updated_at: now,
        };
        registrations.push(stored.clone());
        Ok(stored)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: RegistrationStatus,
    ) -> Result<Option<Registration>, StoreError> {
        Ok(self
            .registrations
            .lock()
            .unwrap()
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| {
                r.status = status;
                r.updated_at = OffsetDateTime::now_utc();
                r.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut registrations = self.registrations.lock().unwrap();
        let before = registrations.len();
        registrations.retain(|r| r.id != id);
        Ok(registrations.len() < before)
    }

    async fn list_by_event(
        &self,
        event_id: Uuid,
        status: Option<RegistrationStatus>,
        page: Page,
    ) -> Result<(Vec<Registration>, i64), StoreError> {
        let registrations = self.registrations.lock().unwrap();
        let mut matching: Vec<_> = registrations
            .iter()
            .filter(|r| r.event_id == event_id && status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn status_counts(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<(RegistrationStatus, i64)>, StoreError> {
        let registrations = self.registrations.lock().unwrap();
        Ok(RegistrationStatus::ALL
            .iter()
            .map(|s| {
                let n = registrations
                    .iter()
                    .filter(|r| r.event_id == event_id && r.status == *s)
                    .count();
                (*s, n as i64)
            })
            .filter(|(_, n)| *n > 0)
            .collect())
    }
}
