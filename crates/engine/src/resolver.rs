//! Delivery-to-volunteer resolver.
//!
//! Turns a delivery id into the device token of the volunteer assigned to it:
//! 1. Fetch the delivery document and read its assignee name
//! 2. Look up the first volunteer whose `user_name` equals that name
//! 3. Return the volunteer's `fcmToken`
//!
//! A missing delivery, an unknown volunteer and an absent token all resolve to
//! `Ok(None)`. Only a store that cannot be reached produces an error.

use std::sync::Arc;

use serde_json::Value;

use pickup_common::error::StoreError;
use pickup_common::store::DocumentStore;
use pickup_common::types::{
    DELIVERIES_COLLECTION, DeliveryRecord, USER_NAME_FIELD, USERS_COLLECTION, VolunteerRecord,
};

/// Resolves delivery ids to volunteer device tokens.
#[derive(Clone)]
pub struct VolunteerResolver {
    store: Arc<dyn DocumentStore>,
}

impl VolunteerResolver {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Fetch the delivery record, if it exists.
    pub async fn find_delivery(&self, delivery_id: &str) -> Result<Option<DeliveryRecord>, StoreError> {
        let doc = self.store.get_by_id(DELIVERIES_COLLECTION, delivery_id).await?;
        Ok(doc.as_ref().map(DeliveryRecord::from))
    }

    /// Fetch the first volunteer registered under `name`.
    pub async fn find_volunteer(&self, name: &str) -> Result<Option<VolunteerRecord>, StoreError> {
        let docs = self
            .store
            .query_by_field(USERS_COLLECTION, USER_NAME_FIELD, &Value::from(name), 1)
            .await?;
        Ok(docs.first().map(VolunteerRecord::from))
    }

    /// Device token of the volunteer assigned to `delivery_id`.
    pub async fn resolve_token(&self, delivery_id: &str) -> Result<Option<String>, StoreError> {
        let Some(delivery) = self.find_delivery(delivery_id).await? else {
            tracing::info!(delivery_id, "Delivery not found");
            return Ok(None);
        };

        let Some(user_name) = delivery.assignee_name else {
            tracing::info!(delivery_id, "Delivery has no assigned volunteer");
            return Ok(None);
        };

        tracing::debug!(delivery_id, user_name = %user_name, "Volunteer name in delivery");

        let Some(volunteer) = self.find_volunteer(&user_name).await? else {
            tracing::info!(delivery_id, user_name = %user_name, "No matching user for user_name");
            return Ok(None);
        };

        tracing::debug!(
            delivery_id,
            user_id = %volunteer.id,
            email = volunteer.email.as_deref().unwrap_or("-"),
            "User found"
        );

        match volunteer.device_token {
            Some(token) => {
                tracing::debug!(delivery_id, token = %token, "FCM token resolved");
                Ok(Some(token))
            }
            None => {
                tracing::info!(delivery_id, user_id = %volunteer.id, "User has no FCM token");
                Ok(None)
            }
        }
    }
}
