//! FitCalc Shared Library
//!
//! Health and fitness calculators shared by the WASM bindings and the CLI:
//! Navy Method body fat with body composition analytics, category lookups,
//! BMI/BMR, one-rep max, heart rate zones, body proportions, unit
//! conversion and last-used value persistence.

pub mod body_composition;
pub mod body_fat;
pub mod categories;
pub mod errors;
pub mod health_metrics;
pub mod heart_rate;
pub mod persistence;
pub mod proportions;
pub mod session;
pub mod strength;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use body_composition::*;
pub use body_fat::*;
pub use categories::*;
pub use errors::*;
pub use health_metrics::*;
pub use heart_rate::*;
pub use proportions::*;
pub use strength::*;
pub use types::*;
pub use units::*;

pub use persistence::{KeyValueStore, MemoryStore, Preferences};
pub use session::{SavedState, Session};
