use {
    crate::utils::DateUtils,
    chrono::NaiveDate,
    serde::{Deserialize, Serialize},
    strum_macros::Display,
};

/// Entitlement tier carried by the license token. Status digit "1" marks a
/// broker-bound account; every other digit is treated as VIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum LicenseStatus {
    Bound,
    #[strum(serialize = "VIP")]
    Vip,
}

/// License expiry as decoded from the token. Unknown digits in the date
/// segment leave the expiry unreadable but never fail the decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expiry {
    Permanent,
    On(NaiveDate),
    Unreadable(String),
}

/// Decoded license token, attached to a Dataset on successful ingestion and
/// never mutated afterward; the next ingestion supersedes it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: String,
    pub status: LicenseStatus,
    pub expiry: Expiry,
    pub is_expired: bool,
}

impl UserInfo {
    /// Expiry as shown to the user ("no expiry" for permanent licenses).
    pub fn expiry_label(&self) -> String {
        match &self.expiry {
            Expiry::Permanent => "no expiry".to_string(),
            Expiry::On(date) => date.format(DateUtils::DISPLAY_FORMAT).to_string(),
            Expiry::Unreadable(digits) => digits.clone(),
        }
    }
}
