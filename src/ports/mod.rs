//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Called by the HTTP adapter into the application
//! - Outbound: Called by the application into storage and randomness

pub mod inbound;
pub mod outbound;

pub use inbound::{CommunityPort, CreatePostRequest};
pub use outbound::{AvatarPicker, PostStore, UserStore};
