//! Data model and reference tables: creature records, threat tiers, roles, conversion profiles
//! and the registries that hold them.

pub mod builtin;
pub mod creature;
pub mod legacy;
pub mod loader;
pub mod packs;
pub mod profile;
pub mod registry;
pub mod role;
pub mod tier;
pub mod validate;
