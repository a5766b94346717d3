use serde::{Deserialize, Serialize};

/// Profile from the "users" collection (read-only in this service)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,  // PRIMARY IDENTIFIER - matches matchingData.userId
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hometown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub about_me: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}
