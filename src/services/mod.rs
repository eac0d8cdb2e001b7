pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod chirp_service;
pub mod chirp_service_impl;
pub use chirp_service::{ChirpError, ChirpService};
pub use chirp_service_impl::SeaOrmChirpService;

pub mod feed_service;
pub mod feed_service_impl;
pub use feed_service::{FeedError, FeedService};
pub use feed_service_impl::DefaultFeedService;

pub mod identity_service;
pub mod identity_service_impl;
pub use identity_service::{IdentityError, IdentityService, Registration};
pub use identity_service_impl::SeaOrmIdentityService;

pub mod relationship_service;
pub mod relationship_service_impl;
pub use relationship_service::{RelationshipError, RelationshipService};
pub use relationship_service_impl::SeaOrmRelationshipService;
