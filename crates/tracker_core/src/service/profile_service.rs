//! Profile use-case service.

use crate::model::profile::{NotificationSetting, ProfileValidationError, UserProfile};
use crate::store::kv_store::KeyValueStore;
use crate::store::profile_store::ProfileStore;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ProfileServiceError {
    Validation(ProfileValidationError),
    Store(StoreError),
}

impl Display for ProfileServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProfileServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ProfileServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ProfileValidationError> for ProfileServiceError {
    fn from(value: ProfileValidationError) -> Self {
        Self::Validation(value)
    }
}

pub struct ProfileService<S: KeyValueStore> {
    store: ProfileStore<S>,
}

impl<S: KeyValueStore> ProfileService<S> {
    pub fn new(store: ProfileStore<S>) -> Self {
        Self { store }
    }

    pub fn get_profile(&self) -> Result<UserProfile, ProfileServiceError> {
        Ok(self.store.load()?)
    }

    /// Updates name and/or email; `None` keeps the stored value.
    pub fn update_identity(
        &self,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<UserProfile, ProfileServiceError> {
        let mut profile = self.store.load()?;
        if let Some(name) = name {
            profile.name = name.trim().to_string();
        }
        if let Some(email) = email {
            profile.email = email.trim().to_string();
        }
        profile.validate()?;
        self.store.save(&profile)?;
        Ok(profile)
    }

    /// Flips one notification setting and returns its new value.
    pub fn toggle_setting(
        &self,
        setting: NotificationSetting,
    ) -> Result<bool, ProfileServiceError> {
        let mut profile = self.store.load()?;
        let enabled = profile.notification_settings.toggle(setting);
        self.store.save(&profile)?;
        Ok(enabled)
    }
}
