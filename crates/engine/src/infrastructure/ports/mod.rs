//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Book data access (in-memory snapshot today, desktop sync backend in the app)
//! - Asset upload (consumed only, the host application owns the adapter)
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::BookRepo;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{AssetUploadPort, UploadedAsset};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::MockBookRepo;

#[cfg(test)]
pub use external::MockAssetUploadPort;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{AssetUploadError, RepoError};
