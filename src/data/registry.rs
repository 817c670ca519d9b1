//! Profile registry: immutable lookup from profile id to [ConversionProfile].
//! The built-in set is constructed once per process; callers that load extra profiles build their
//! own registry with [ProfileRegistry::with_profile] and pass it to the engine explicitly.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use tracing::debug;

use crate::data::builtin::{builtin_profiles, osr_generic_profile};
use crate::data::legacy::canonical_profile_alias;
use crate::data::profile::ConversionProfile;

#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, ConversionProfile>,
    fallback: ConversionProfile,
}

impl ProfileRegistry {
    /// Registry holding only the built-in profiles.
    pub fn builtin() -> Self {
        let profiles = builtin_profiles()
            .into_iter()
            .map(|profile| (profile.id.clone(), profile))
            .collect();
        Self {
            profiles,
            fallback: osr_generic_profile(),
        }
    }

    pub fn with_profile(mut self, profile: ConversionProfile) -> Self {
        self.profiles.insert(profile.id.clone(), profile);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.profiles.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ConversionProfile> {
        self.profiles.get(id)
    }

    /// Look up by id or alias; anything unknown resolves to the generic profile.
    pub fn resolve(&self, id: &str) -> &ConversionProfile {
        if let Some(profile) = self.get(id) {
            return profile;
        }
        if let Some(profile) = canonical_profile_alias(id).and_then(|canonical| self.get(canonical)) {
            return profile;
        }
        debug!(profile_id = id, fallback = %self.fallback.id, "unknown profile id, using fallback");
        &self.fallback
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Profiles in id order.
    pub fn profiles(&self) -> impl Iterator<Item = &ConversionProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

static BUILTIN_REGISTRY: LazyLock<ProfileRegistry> = LazyLock::new(ProfileRegistry::builtin);

pub fn builtin_registry() -> &'static ProfileRegistry {
    &BUILTIN_REGISTRY
}

/// Built-in profile by id or alias, falling back to the generic profile.
pub fn get_profile(id: &str) -> &'static ConversionProfile {
    BUILTIN_REGISTRY.resolve(id)
}
