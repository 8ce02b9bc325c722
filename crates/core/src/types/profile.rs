//! User body/activity profile and its validation.
//!
//! The profile form collects free text (name, weight, height, age) and three
//! enumerated choices. [`ProfileForm::validate`] checks everything at once
//! and reports every violation, so a front end can show them together.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Weight bounds in kilograms (inclusive).
pub const WEIGHT_RANGE_KG: (f64, f64) = (20.0, 300.0);
/// Height bounds in centimetres (inclusive).
pub const HEIGHT_RANGE_CM: (f64, f64) = (100.0, 250.0);
/// Age bounds in years (inclusive).
pub const AGE_RANGE_YEARS: (u32, u32) = (12, 120);

/// Errors found when validating a [`ProfileForm`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("weight must be a number")]
    WeightNotANumber,
    #[error("weight must be at least 20 kg")]
    WeightTooLow,
    #[error("weight cannot exceed 300 kg")]
    WeightTooHigh,
    #[error("height must be a number")]
    HeightNotANumber,
    #[error("height must be at least 100 cm")]
    HeightTooLow,
    #[error("height cannot exceed 250 cm")]
    HeightTooHigh,
    #[error("age must be a whole number")]
    AgeNotANumber,
    #[error("age must be at least 12 years")]
    AgeTooLow,
    #[error("age cannot exceed 120 years")]
    AgeTooHigh,
    #[error("unknown gender: {0}")]
    InvalidGender(String),
    #[error("unknown activity level: {0}")]
    InvalidActivity(String),
    #[error("unknown objective: {0}")]
    InvalidObjective(String),
}

/// All violations found in one form submission.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid profile: {}", join_errors(.0))]
pub struct ProfileErrors(pub Vec<ProfileError>);

impl ProfileErrors {
    /// Whether a specific violation was reported.
    #[must_use]
    pub fn contains(&self, error: &ProfileError) -> bool {
        self.0.contains(error)
    }

    /// The individual violations.
    #[must_use]
    pub fn errors(&self) -> &[ProfileError] {
        &self.0
    }
}

fn join_errors(errors: &[ProfileError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Enumerated Choices
// =============================================================================

/// Defines an enumerated profile choice with its wire key and Norwegian label.
macro_rules! profile_choice {
    (
        $(#[$meta:meta])*
        $name:ident, $err:ident {
            $($variant:ident => ($key:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every choice, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stored/wire key (e.g., `lightly_active`).
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $key),+
                }
            }

            /// Norwegian display label.
            #[must_use]
            pub const fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ProfileError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($key => Ok(Self::$variant),)+
                    other => Err(ProfileError::$err(other.to_owned())),
                }
            }
        }
    };
}

profile_choice!(
    /// Gender, sent to the recommender as `category`.
    Gender, InvalidGender {
        Male => ("male", "Mann"),
        Female => ("female", "Kvinne"),
    }
);

profile_choice!(
    /// Daily activity intensity.
    ActivityLevel, InvalidActivity {
        Sedentary => ("sedentary", "Stillesittende"),
        LightlyActive => ("lightly_active", "Lett aktiv"),
        ModeratelyActive => ("moderately_active", "Moderat aktiv"),
        VeryActive => ("very_active", "Veldig aktiv"),
        ExtraActive => ("extra_active", "Ekstremt aktiv"),
    }
);

profile_choice!(
    /// Dietary objective.
    Objective, InvalidObjective {
        WeightLoss => ("weight_loss", "Vektnedgang"),
        MuscleGain => ("muscle_gain", "Muskeløkning"),
        HealthMaintenance => ("health_maintenance", "Vedlikehold"),
    }
);

// =============================================================================
// Profile
// =============================================================================

/// A validated user profile, as persisted on the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub gender: Gender,
    /// Kilograms.
    pub weight: f64,
    /// Centimetres.
    pub height: f64,
    /// Years.
    pub age: u32,
    pub activity: ActivityLevel,
    pub objective: Objective,
    /// Local URI of the chosen picture.
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Raw profile form input, exactly as typed/selected by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub gender: String,
    pub weight: String,
    pub height: String,
    pub age: String,
    pub activity: String,
    pub objective: String,
    pub profile_picture: Option<String>,
}

impl ProfileForm {
    /// Validate the form and build a [`Profile`].
    ///
    /// Inputs are trimmed first. Every violation is collected rather than
    /// stopping at the first one.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileErrors`] listing each invalid field.
    pub fn validate(&self) -> Result<Profile, ProfileErrors> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(ProfileError::EmptyName);
        }

        let weight = check_measure(
            &self.weight,
            WEIGHT_RANGE_KG,
            [
                ProfileError::WeightNotANumber,
                ProfileError::WeightTooLow,
                ProfileError::WeightTooHigh,
            ],
            &mut errors,
        );
        let height = check_measure(
            &self.height,
            HEIGHT_RANGE_CM,
            [
                ProfileError::HeightNotANumber,
                ProfileError::HeightTooLow,
                ProfileError::HeightTooHigh,
            ],
            &mut errors,
        );
        let age = check_age(&self.age, &mut errors);

        let gender = self.gender.parse::<Gender>().map_err(|e| errors.push(e)).ok();
        let activity = self
            .activity
            .parse::<ActivityLevel>()
            .map_err(|e| errors.push(e))
            .ok();
        let objective = self
            .objective
            .parse::<Objective>()
            .map_err(|e| errors.push(e))
            .ok();

        match (weight, height, age, gender, activity, objective) {
            (Some(weight), Some(height), Some(age), Some(gender), Some(activity), Some(objective))
                if errors.is_empty() =>
            {
                Ok(Profile {
                    name: name.to_owned(),
                    gender,
                    weight,
                    height,
                    age,
                    activity,
                    objective,
                    profile_picture: self.profile_picture.clone(),
                })
            }
            _ => Err(ProfileErrors(errors)),
        }
    }
}

impl From<&Profile> for ProfileForm {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            gender: profile.gender.to_string(),
            weight: profile.weight.to_string(),
            height: profile.height.to_string(),
            age: profile.age.to_string(),
            activity: profile.activity.to_string(),
            objective: profile.objective.to_string(),
            profile_picture: profile.profile_picture.clone(),
        }
    }
}

/// Parse a bounded decimal measure; `kinds` is `[not_a_number, too_low, too_high]`.
fn check_measure(
    input: &str,
    (min, max): (f64, f64),
    kinds: [ProfileError; 3],
    errors: &mut Vec<ProfileError>,
) -> Option<f64> {
    let [not_a_number, too_low, too_high] = kinds;
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if value < min {
                errors.push(too_low);
                None
            } else if value > max {
                errors.push(too_high);
                None
            } else {
                Some(value)
            }
        }
        _ => {
            errors.push(not_a_number);
            None
        }
    }
}

fn check_age(input: &str, errors: &mut Vec<ProfileError>) -> Option<u32> {
    let (min, max) = AGE_RANGE_YEARS;
    match input.trim().parse::<u32>() {
        Ok(age) if age < min => {
            errors.push(ProfileError::AgeTooLow);
            None
        }
        Ok(age) if age > max => {
            errors.push(ProfileError::AgeTooHigh);
            None
        }
        Ok(age) => Some(age),
        Err(_) => {
            errors.push(ProfileError::AgeNotANumber);
            None
        }
    }
}
