use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix of `identifier` for email verification records
pub const EMAIL_VERIFICATION_PREFIX: &str = "email-verification:";

/// One-time verification value (email confirmation)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Verification {
    pub id: Uuid,
    pub identifier: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Verification {
    /// User id encoded in an email verification identifier.
    pub fn email_verification_user(&self) -> Option<Uuid> {
        self.identifier
            .strip_prefix(EMAIL_VERIFICATION_PREFIX)
            .and_then(|id| Uuid::parse_str(id).ok())
    }
}

pub fn email_verification_identifier(user_id: Uuid) -> String {
    format!("{}{}", EMAIL_VERIFICATION_PREFIX, user_id)
}
