//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the session store and the meal generator.

pub mod admin;
pub mod assistant;
pub mod favorites;
pub mod history;
pub mod planner;
pub mod profile;
pub mod user;

pub use admin::AdminService;
pub use assistant::AssistantService;
pub use favorites::FavoritesService;
pub use history::HistoryService;
pub use planner::PlannerService;
pub use profile::ProfileService;
pub use user::UserService;
