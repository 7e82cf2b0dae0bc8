use serde::{Deserialize, Serialize};

use crate::store::Document;

/// Collection holding delivery tasks.
pub const DELIVERIES_COLLECTION: &str = "deliveries";

/// Collection holding volunteer profiles.
pub const USERS_COLLECTION: &str = "users";

/// Volunteer name; the join key between a delivery and a volunteer.
pub const USER_NAME_FIELD: &str = "user_name";

/// Registered device push token on a volunteer profile.
pub const FCM_TOKEN_FIELD: &str = "fcmToken";

pub const EMAIL_FIELD: &str = "email";

/// A delivery task, read-only from this service's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub id: String,
    /// Name of the volunteer the delivery is assigned to
    pub assignee_name: Option<String>,
}

impl From<&Document> for DeliveryRecord {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            assignee_name: doc.get_str(USER_NAME_FIELD).map(str::to_string),
        }
    }
}

/// A volunteer profile from the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerRecord {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub device_token: Option<String>,
}

impl From<&Document> for VolunteerRecord {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.get_str(USER_NAME_FIELD).map(str::to_string),
            email: doc.get_str(EMAIL_FIELD).map(str::to_string),
            device_token: doc.get_str(FCM_TOKEN_FIELD).map(str::to_string),
        }
    }
}

/// A single push notification addressed to one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub token: String,
    pub title: String,
    pub body: String,
}

impl NotificationRequest {
    pub fn new(token: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Identifier the provider hands back after accepting a message,
/// e.g. `projects/my-project/messages/0:1500415314455276%31bd1c9631bd1c96`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderReceipt(pub String);

impl std::fmt::Display for ProviderReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
