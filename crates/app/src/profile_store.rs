//! Validated user profile with write-through persistence.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use handlekurv_core::{Profile, ProfileErrors, ProfileForm, RecommendationRequest};
use tracing::{debug, info, instrument, warn};

use crate::storage::{KeyValueStore, PROFILE_KEY, PersistHandle, WriteThrough};

/// Owner of the user's body/activity profile.
#[derive(Debug)]
pub struct ProfileStore<S> {
    profile: Mutex<Option<Profile>>,
    writer: WriteThrough<S>,
}

impl<S: KeyValueStore> ProfileStore<S> {
    /// Load the persisted profile.
    ///
    /// Missing, malformed or out-of-range data means no profile.
    #[instrument(skip(store))]
    pub async fn load(store: Arc<S>) -> Self {
        let profile = match store.get(PROFILE_KEY).await {
            Ok(Some(json)) => serde_json::from_str::<Profile>(&json)
                .map_err(|e| warn!(error = %e, "Stored profile is malformed, ignoring"))
                .ok()
                .and_then(|stored| {
                    ProfileForm::from(&stored)
                        .validate()
                        .map_err(|e| warn!(error = %e, "Stored profile is invalid, ignoring"))
                        .ok()
                }),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored profile");
                None
            }
        };

        debug!(has_profile = profile.is_some(), "Loaded profile");
        Self {
            profile: Mutex::new(profile),
            writer: WriteThrough::new(store, PROFILE_KEY),
        }
    }

    /// Validate `form` and, if valid, replace and persist the profile.
    ///
    /// # Errors
    ///
    /// Returns every validation failure; the stored profile is untouched.
    pub fn save(&self, form: &ProfileForm) -> Result<PersistHandle, ProfileErrors> {
        let validated = form.validate()?;

        let mut profile = self.lock();
        let handle = self.writer.write_json(&validated);
        info!(name = %validated.name, "Saved profile");
        *profile = Some(validated);

        Ok(handle)
    }

    /// Current profile, if one has been saved.
    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.lock().clone()
    }

    /// Recipe recommendation request for the current profile.
    #[must_use]
    pub fn recommendation_request(&self) -> Option<RecommendationRequest> {
        self.lock().as_ref().map(RecommendationRequest::from)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Profile>> {
        self.profile.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
