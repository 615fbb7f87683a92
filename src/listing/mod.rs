pub mod board;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use rotibank_shared::listing::*;

use rotibank_shared::listing::handle::CreateListingReq;

/// A food donation published by a restaurant.
///
/// Status and volunteer only change through [`Transition`], which keeps
/// `volunteer` set exactly when the status is [`ListingStatus::Accepted`].
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Listing {
    id: u64,
    restaurant: u64,
    title: String,
    description: String,
    quantity: String,
    expiry_time: DateTime<Utc>,
    pickup_location: String,
    status: ListingStatus,
    #[serde(default)]
    volunteer: Option<u64>,
    created_at: DateTime<Utc>,
}

/// Descriptive fields a restaurant fills in when listing food.
#[derive(Debug, Clone)]
pub struct ListingFields {
    pub title: String,
    pub description: String,
    pub quantity: String,
    pub expiry_time: DateTime<Utc>,
    /// Falls back to the restaurant's address if `None`.
    pub pickup_location: Option<String>,
}

impl From<CreateListingReq> for ListingFields {
    fn from(req: CreateListingReq) -> Self {
        Self {
            title: req.title,
            description: req.description,
            quantity: req.quantity,
            expiry_time: req.expiry_time,
            pickup_location: req.pickup_location,
        }
    }
}

/// A legal move out of [`ListingStatus::Available`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Bound to a volunteer for pickup.
    Accept { volunteer: u64 },
    Expire,
    /// Withdrawn by the restaurant.
    Cancel,
}

impl Transition {
    pub fn target(&self) -> ListingStatus {
        match self {
            Transition::Accept { .. } => ListingStatus::Accepted,
            Transition::Expire => ListingStatus::Expired,
            Transition::Cancel => ListingStatus::Cancelled,
        }
    }
}

impl Listing {
    pub fn new(
        id: u64,
        restaurant: u64,
        fields: ListingFields,
        pickup_location: String,
    ) -> Self {
        Self {
            id,
            restaurant,
            title: fields.title,
            description: fields.description,
            quantity: fields.quantity,
            expiry_time: fields.expiry_time,
            pickup_location,
            status: ListingStatus::Available,
            volunteer: None,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn restaurant(&self) -> u64 {
        self.restaurant
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    #[inline]
    pub fn pickup_location(&self) -> &str {
        &self.pickup_location
    }

    #[inline]
    pub fn expiry_time(&self) -> DateTime<Utc> {
        self.expiry_time
    }

    #[inline]
    pub fn status(&self) -> ListingStatus {
        self.status
    }

    #[inline]
    pub fn volunteer(&self) -> Option<u64> {
        self.volunteer
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the expiry time has been reached at `now`.
    #[inline]
    pub fn is_past_expiry(&self, now: DateTime<Utc>) -> bool {
        self.expiry_time <= now
    }

    /// Whether volunteers can still pick this listing up at `now`.
    #[inline]
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.status == ListingStatus::Available && !self.is_past_expiry(now)
    }

    /// Applies a transition.
    ///
    /// Callers must have checked the listing is still available,
    /// see [`crate::store::Store::transition_listing`].
    pub(crate) fn apply(&mut self, transition: Transition) {
        debug_assert_eq!(self.status, ListingStatus::Available);
        self.volunteer = match transition {
            Transition::Accept { volunteer } => Some(volunteer),
            Transition::Expire | Transition::Cancel => None,
        };
        self.status = transition.target();
    }

    pub fn info(&self) -> ListingInfo {
        ListingInfo {
            id: self.id,
            restaurant: self.restaurant,
            title: self.title.clone(),
            description: self.description.clone(),
            quantity: self.quantity.clone(),
            expiry_time: self.expiry_time,
            pickup_location: self.pickup_location.clone(),
            status: self.status,
            volunteer: self.volunteer,
            created_at: self.created_at,
        }
    }
}

/// Sorts listings by creation time, most recent first.
pub(crate) fn newest_first(mut listings: Vec<Listing>) -> Vec<Listing> {
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    listings
}
