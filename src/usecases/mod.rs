//! Application use cases. Orchestrate domain logic via ports.

pub mod community_service;

pub use community_service::CommunityService;
