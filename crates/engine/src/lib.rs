//! BookForge Engine library.
//!
//! Orchestration around the pure planning derivations in `bookforge_domain`.
//!
//! ## Structure
//!
//! - `use_cases/` - User story orchestration over the ports
//! - `infrastructure/` - Port traits and their adapters
//! - `config` - Environment-driven settings for the binary
//! - `app` - Application composition

pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
pub use config::{ConfigError, EngineConfig};
