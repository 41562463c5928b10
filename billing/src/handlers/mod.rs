pub mod billing;
pub mod trial;
