use serde::{Deserialize, Serialize};

use super::{Profile, Role};

#[derive(Serialize, Deserialize)]
pub struct RegisterReq {
    pub email: lettre::Address,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub profile: Profile,
}

#[derive(Serialize, Deserialize)]
pub struct RegisterRes {
    pub id: u64,
}

#[derive(Serialize, Deserialize)]
pub struct LoginReq {
    pub email: lettre::Address,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct LoginRes {
    pub id: u64,
    pub token: String,
    /// Unix timestamp, `None` if the token never expires.
    pub expire_at: Option<i64>,
}

#[derive(Serialize, Deserialize, Default)]
pub struct ModifyReq {
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub password: Option<ModifyPasswordPart>,
}

#[derive(Serialize, Deserialize)]
pub struct ModifyPasswordPart {
    pub old: String,
    pub new: String,
}

#[derive(Serialize, Deserialize, Default)]
pub struct LeaderboardReq {
    /// Ranked role, restaurants if `None`.
    #[serde(default)]
    pub role: Option<Role>,
    /// Maximum number of entries, defaults to 10.
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub id: u64,
    pub name: String,
    pub points: u64,
    pub meals_shared: u64,
    pub meals_delivered: u64,
}
