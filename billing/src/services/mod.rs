pub mod entitlements;
pub mod trials;
pub mod usage;

pub use entitlements::EntitlementService;
pub use trials::TrialService;
pub use usage::UsageService;
