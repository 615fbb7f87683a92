pub mod handle;

use serde::{Deserialize, Serialize};

/// Lifecycle of a listing.
///
/// Only `Available` may move, and only to one of the other three.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Available,
    Accepted,
    Expired,
    Cancelled,
}

/// A food donation as seen over the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ListingInfo {
    pub id: u64,
    /// Owning restaurant account.
    pub restaurant: u64,
    pub title: String,
    pub description: String,
    pub quantity: String,
    pub expiry_time: chrono::DateTime<chrono::Utc>,
    pub pickup_location: String,
    pub status: ListingStatus,
    /// The volunteer who accepted this listing.
    pub volunteer: Option<u64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
