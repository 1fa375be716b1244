//! FoodBuddy Shared Library
//!
//! Domain types and pure logic used by the backend and the WASM module:
//! energy math, profiles, meal plans and their lifecycle, favorites,
//! history, validation and user-facing messages.

pub mod energy;
pub mod errors;
pub mod favorites;
pub mod history;
pub mod i18n;
pub mod meal;
pub mod plan;
pub mod profile;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use energy::*;
pub use errors::*;
pub use favorites::{FavoriteChange, FavoriteSet};
pub use i18n::{Locale, Message};
pub use meal::*;
pub use plan::{DailyPlanner, GenerationTicket, PlanState, PlanStatus, GENERATION_STALE_AFTER_SECS};
pub use profile::*;
pub use types::*;
