use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Chirp, ChirpId, Identity, IdentityProfile, UserId};

/// Body of every non-field error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Public view of an identity. Built field by field so the credential hash
/// has no path onto the wire.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: UserId,
    pub username: String,
    pub date_joined: DateTime<Utc>,
    pub chirps: Vec<ChirpId>,
}

impl From<IdentityProfile> for UserDto {
    fn from(profile: IdentityProfile) -> Self {
        Self {
            id: profile.identity.id,
            username: profile.identity.username,
            date_joined: profile.identity.date_joined,
            chirps: profile.chirp_ids,
        }
    }
}

impl From<Identity> for UserDto {
    /// For a freshly registered identity, which has no chirps yet.
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username,
            date_joined: identity.date_joined,
            chirps: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChirpDto {
    pub id: ChirpId,
    pub author: Option<UserId>,
    pub time_posted: DateTime<Utc>,
    pub text: String,
}

impl From<Chirp> for ChirpDto {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            author: chirp.author,
            time_posted: chirp.time_posted,
            text: chirp.text,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub redirect: String,
}

// Request fields are optional so a missing key is reported per field instead
// of failing the whole body. Unknown keys (e.g. `author`, `time_posted`) are ignored.

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateChirpRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub user_to_follow: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnfollowRequest {
    pub user_to_unfollow: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthLiveResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthReadinessChecks {
    pub database: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthReadyResponse {
    pub ready: bool,
    pub checks: HealthReadinessChecks,
}
