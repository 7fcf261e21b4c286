//! User Aggregate
//!
//! Records are created on first external-identity sign-in; phone and vehicle
//! number stay optional until the first checkout requires them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn register(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            phone: None,
            vehicle_number: None,
            created_at: Utc::now(),
        }
    }

    /// Checkout requires a 10-digit phone and a vehicle number of at least
    /// 8 characters.
    pub fn needs_profile_completion(&self) -> bool {
        let phone_ok = self.phone.as_deref().is_some_and(|p| p.len() == 10);
        let vehicle_ok = self.vehicle_number.as_deref().is_some_and(|v| v.len() >= 8);
        !(phone_ok && vehicle_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_user_needs_completion() {
        let user = User::register("A. Kumar", "a.kumar@example.com");
        assert!(user.needs_profile_completion());
    }

    #[test]
    fn test_profile_complete_after_both_fields() {
        let mut user = User::register("A. Kumar", "a.kumar@example.com");
        user.phone = Some("9876543210".into());
        assert!(user.needs_profile_completion()); // vehicle still missing
        user.vehicle_number = Some("MH12AB1234".into());
        assert!(!user.needs_profile_completion());
    }

    #[test]
    fn test_short_values_do_not_count() {
        let mut user = User::register("A. Kumar", "a.kumar@example.com");
        user.phone = Some("98765".into());
        user.vehicle_number = Some("MH12".into());
        assert!(user.needs_profile_completion());
    }
}
