use chrono::NaiveDate;
use common::UserId;
use serde::{Deserialize, Serialize};

/// User data as returned by the directory.
///
/// Transient: attached to order responses at read time and never stored
/// alongside an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    pub id: UserId,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
}
