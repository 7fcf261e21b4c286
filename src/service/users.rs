//! User lifecycle: first sign-in registration and profile completion.
//!
//! Identity itself comes from the external provider; the email it hands us
//! is trusted as-is.

use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::config::{AccessError, AdminList};
use crate::domain::aggregates::user::User;
use crate::domain::events::{DomainEvent, UserEvent};
use crate::store::{StoreError, UserStore};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("invalid user payload: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("user not found")]
    NotFound,
    #[error("phone number must be 10 digits")]
    InvalidPhone,
    #[error("vehicle number must be at least 8 characters")]
    InvalidVehicleNumber,
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct UserService {
    users: Arc<dyn UserStore>,
    admins: AdminList,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, admins: AdminList) -> Self {
        Self { users, admins }
    }

    /// Creates the record on first sign-in; an email that already has one
    /// gets the existing record back.
    pub async fn ensure(&self, req: RegisterUser) -> Result<User, UserError> {
        req.validate()?;
        if let Some(existing) = self.users.by_email(&req.email).await? {
            return Ok(existing);
        }
        let user = User::register(req.name, req.email);
        self.users.insert(user.clone()).await?;
        DomainEvent::User(UserEvent::Registered {
            user_id: user.id.clone(),
        })
        .emit();
        Ok(user)
    }

    pub async fn get(&self, id: &str) -> Result<User, UserError> {
        self.users.get(id).await?.ok_or(UserError::NotFound)
    }

    /// The checkout gate: true until phone and vehicle number are filled in.
    pub async fn needs_profile_completion(&self, id: &str) -> Result<bool, UserError> {
        Ok(self.get(id).await?.needs_profile_completion())
    }

    pub async fn set_phone(&self, id: &str, phone: String) -> Result<(), UserError> {
        if phone.len() != 10 || !phone.bytes().all(|b| b.is_ascii_digit()) {
            return Err(UserError::InvalidPhone);
        }
        match self.users.set_phone(id, phone).await {
            Err(StoreError::NotFound) => Err(UserError::NotFound),
            other => Ok(other?),
        }
    }

    pub async fn set_vehicle_number(&self, id: &str, vehicle: String) -> Result<(), UserError> {
        if vehicle.trim().len() < 8 {
            return Err(UserError::InvalidVehicleNumber);
        }
        match self.users.set_vehicle_number(id, vehicle).await {
            Err(StoreError::NotFound) => Err(UserError::NotFound),
            other => Ok(other?),
        }
    }

    /// Full-collection read, allow-list gated.
    pub async fn all(&self, caller: &str) -> Result<Vec<User>, UserError> {
        self.admins.authorize(caller)?;
        Ok(self.users.all().await?)
    }
}
