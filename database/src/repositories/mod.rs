pub mod subscriptions;
pub mod trials;
pub mod usage;

pub use subscriptions::SubscriptionsRepository;
pub use trials::TrialsRepository;
pub use usage::UsageRepository;
