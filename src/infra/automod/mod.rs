// Storage implementations for the automod feature.

pub mod json_store;

pub use json_store::JsonRuleStore;
