use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone)]
pub struct CreateListingReq {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub quantity: String,
    pub expiry_time: chrono::DateTime<chrono::Utc>,
    /// Falls back to the restaurant's address.
    #[serde(default)]
    pub pickup_location: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct CreateListingRes {
    pub id: u64,
}

/// Targets a single listing, used by get, cancel and claim.
#[derive(Serialize, Deserialize)]
pub struct ListingReq {
    pub listing: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ListingsRes {
    pub listings: Vec<super::ListingInfo>,
}
