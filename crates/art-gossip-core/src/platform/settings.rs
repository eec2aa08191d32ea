//! Serializable session state for the platform client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Mobile app user agent the private API expects.
pub const DEFAULT_USER_AGENT: &str = "Instagram 269.0.0.18.75 Android (26/8.0.0; 480dpi; \
1080x1920; OnePlus; 6T Dev; devitron; qcom; en_US; 314665256)";

/// Per-device identifiers. These survive a session reset so the account
/// keeps looking like the same phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIds {
    pub phone_id: String,
    pub uuid: String,
    pub client_session_id: String,
    pub advertising_id: String,
    pub android_device_id: String,
}

impl DeviceIds {
    /// Fresh random identifiers.
    pub fn generate() -> Self {
        let android = Uuid::new_v4().simple().to_string();
        Self {
            phone_id: Uuid::new_v4().to_string(),
            uuid: Uuid::new_v4().to_string(),
            client_session_id: Uuid::new_v4().to_string(),
            advertising_id: Uuid::new_v4().to_string(),
            android_device_id: format!("android-{}", &android[..16]),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Everything needed to resume a session without a password login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub uuids: DeviceIds,

    #[serde(default)]
    pub cookies: BTreeMap<String, String>,

    /// Full `Authorization` header value issued at login
    #[serde(default)]
    pub authorization: Option<String>,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl SessionSettings {
    /// Unauthenticated settings for a brand-new device.
    pub fn fresh() -> Self {
        Self::with_device_ids(DeviceIds::generate())
    }

    /// Unauthenticated settings that keep the given device identity.
    pub fn with_device_ids(uuids: DeviceIds) -> Self {
        Self {
            uuids,
            cookies: BTreeMap::new(),
            authorization: None,
            user_id: None,
            last_login: None,
            user_agent: default_user_agent(),
        }
    }

    /// Whether a login can be skipped in favor of the stored authorization.
    pub fn is_authenticated(&self) -> bool {
        self.authorization.is_some() && self.user_id.is_some()
    }
}
