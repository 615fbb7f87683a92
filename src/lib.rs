use axum::{http::StatusCode, response::IntoResponse};
use serde::Serialize;

pub mod config;

pub mod account;
pub mod claim;
pub mod listing;

pub mod store;
pub mod sweep;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("an account with this email already exists")]
    DuplicateEmail,
    #[error("email or password incorrect")]
    InvalidCredentials,
    #[error("account {0} not found")]
    AccountNotFound(u64),
    #[error("listing {0} not found")]
    ListingNotFound(u64),
    #[error("listing {0} is no longer available")]
    AlreadyClaimed(u64),
    #[error("listing {0} has expired")]
    Expired(u64),
    #[error("account {0} is not a volunteer")]
    NotAVolunteer(u64),
    #[error("account {0} is not a restaurant")]
    NotARestaurant(u64),
    #[error("permission denied")]
    PermissionDenied,

    #[error("not logged in")]
    NotLoggedIn,
    #[error("non-ascii header value: {0}")]
    HeaderNonAscii(axum::http::header::ToStrError),
    #[error("auth headers must carry a numeric AccountId and a Token")]
    InvalidAuthHeader,
    #[error("address error: {0}")]
    EmailAddress(lettre::address::AddressError),

    #[error("id {0} conflicted")]
    IdConflict(u64),
    #[error("io error: {0}")]
    Io(std::io::Error),
    #[error("failed to decode record: {0}")]
    TomlDe(toml::de::Error),
    #[error("failed to encode record: {0}")]
    TomlSer(toml::ser::Error),
}

impl Error {
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            Error::DuplicateEmail | Error::AlreadyClaimed(_) | Error::IdConflict(_) => {
                StatusCode::CONFLICT
            }
            Error::InvalidCredentials | Error::NotLoggedIn => StatusCode::UNAUTHORIZED,
            Error::AccountNotFound(_) | Error::ListingNotFound(_) => StatusCode::NOT_FOUND,
            Error::Expired(_) => StatusCode::GONE,
            Error::NotAVolunteer(_) | Error::NotARestaurant(_) | Error::PermissionDenied => {
                StatusCode::FORBIDDEN
            }
            Error::HeaderNonAscii(_) | Error::InvalidAuthHeader | Error::EmailAddress(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Io(_) | Error::TomlDe(_) | Error::TomlSer(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    #[inline]
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct ErrorInfo {
            error: String,
        }
        (
            self.to_status_code(),
            axum::Json(ErrorInfo {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Implements `From<T>` for [`Error`].
macro_rules! impl_from {
    ($($t:ty => $v:ident),* $(,)?) => {
        $(
            impl From<$t> for $crate::Error {
                #[inline]
                fn from(err: $t) -> Self {
                    Self::$v(err)
                }
            }
        )*
    };
}

impl_from! {
    axum::http::header::ToStrError => HeaderNonAscii,
    lettre::address::AddressError => EmailAddress,
    std::io::Error => Io,
    toml::de::Error => TomlDe,
    toml::ser::Error => TomlSer,
}
