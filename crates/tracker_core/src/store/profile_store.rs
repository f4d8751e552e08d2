//! User profile document store.

use crate::model::profile::UserProfile;
use crate::store::kv_store::KeyValueStore;
use crate::store::{decode_or_default, StoreError, StoreResult};

/// Fixed key holding the serialized user profile.
pub const PROFILE_KEY: &str = "userProfile";

pub struct ProfileStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> ProfileStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Loads the profile, or the default profile when none is stored.
    pub fn load(&self) -> StoreResult<UserProfile> {
        let raw = self.kv.get(PROFILE_KEY)?;
        Ok(decode_or_default(PROFILE_KEY, raw.as_deref()))
    }

    pub fn save(&self, profile: &UserProfile) -> StoreResult<()> {
        let encoded = serde_json::to_string(profile).map_err(StoreError::Encode)?;
        self.kv.set(PROFILE_KEY, &encoded)
    }
}
