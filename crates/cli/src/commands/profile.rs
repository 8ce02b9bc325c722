//! Profile commands.

use handlekurv_app::{AppState, KeyValueStore, Result};
use handlekurv_core::ProfileForm;

use super::persist;
use crate::output;

/// Field values given on the command line; unset fields keep their stored value.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub age: Option<String>,
    pub activity: Option<String>,
    pub objective: Option<String>,
    pub picture: Option<String>,
}

impl ProfileUpdate {
    /// Overlay the given fields on `form`.
    fn apply(self, mut form: ProfileForm) -> ProfileForm {
        let overlay = |target: &mut String, value: Option<String>| {
            if let Some(value) = value {
                *target = value;
            }
        };
        overlay(&mut form.name, self.name);
        overlay(&mut form.gender, self.gender);
        overlay(&mut form.weight, self.weight);
        overlay(&mut form.height, self.height);
        overlay(&mut form.age, self.age);
        overlay(&mut form.activity, self.activity);
        overlay(&mut form.objective, self.objective);
        if self.picture.is_some() {
            form.profile_picture = self.picture;
        }
        form
    }
}

/// Show the stored profile.
pub fn show<S: KeyValueStore>(state: &AppState<S>) -> String {
    output::profile(state.profile().profile().as_ref())
}

/// Validate and save the profile.
///
/// Starts from the stored profile, so a single field can be changed.
pub async fn set<S: KeyValueStore>(state: &AppState<S>, update: ProfileUpdate) -> Result<String> {
    let current = state
        .profile()
        .profile()
        .map(|profile| ProfileForm::from(&profile))
        .unwrap_or_default();

    let handle = state.profile().save(&update.apply(current))?;
    persist(handle).await;

    Ok(format!(
        "Profile saved.\n{}",
        output::profile(state.profile().profile().as_ref())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_overlays_only_given_fields() {
        let stored = ProfileForm {
            name: "Kari".to_string(),
            weight: "64".to_string(),
            age: "31".to_string(),
            ..ProfileForm::default()
        };
        let update = ProfileUpdate {
            weight: Some("62.5".to_string()),
            ..ProfileUpdate::default()
        };

        let form = update.apply(stored);
        assert_eq!(form.name, "Kari");
        assert_eq!(form.weight, "62.5");
        assert_eq!(form.age, "31");
        assert!(form.profile_picture.is_none());
    }
}
