//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod favorites;
pub mod history;
pub mod profile;
pub mod user;

pub use favorites::{FavoriteRecord, FavoriteRepository};
pub use history::{HistoryRecord, HistoryRepository};
pub use profile::{ProfileRecord, ProfileRepository};
pub use user::{UserRecord, UserRepository};
