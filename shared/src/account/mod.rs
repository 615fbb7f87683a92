pub mod handle;

use serde::{Deserialize, Serialize};

/// The kind of organization or person behind an account.
///
/// Fixed at registration.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Lists surplus food.
    Restaurant,
    /// Picks listings up and delivers them.
    Volunteer,
    Ngo,
}

/// Descriptive fields of an account, all optional.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Profile {
    /// Name shown to other users: organization, then contact person,
    /// then the local part of the email.
    pub fn display_name<'a>(&'a self, email: &'a lettre::Address) -> &'a str {
        self.organization_name
            .as_deref()
            .or(self.contact_person.as_deref())
            .unwrap_or_else(|| email.user())
    }
}

/// Public view of an account.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: u64,
    pub email: lettre::Address,
    pub role: Role,
    pub profile: Profile,
    /// Reward points, only earned by restaurants.
    pub points: u64,
    /// Listings of this restaurant picked up by volunteers.
    pub meals_shared: u64,
    /// Listings this volunteer claimed for delivery.
    #[serde(default)]
    pub meals_delivered: u64,
    pub registration_time: chrono::DateTime<chrono::Utc>,
}

/// A reward unlocked at a points threshold.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Milestone {
    pub points: u64,
    pub reward: String,
    pub achieved: bool,
}

/// Where a restaurant stands on the reward ladder.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct RewardsInfo {
    pub points: u64,
    pub milestones: Vec<Milestone>,
    /// First milestone not yet achieved, `None` once all are.
    pub next: Option<Milestone>,
    /// Percentage of the points needed for `next`, 100 once all are achieved.
    pub progress_percent: u8,
}
