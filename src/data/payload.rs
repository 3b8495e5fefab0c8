use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidateUrl, ValidationError};

use crate::entity::user::Gender;

/// An optional profile attribute as it arrived in a request body.
///
/// `Unset` means the key was absent and the stored value must be left alone,
/// `Clear` means the client asked for the value to be removed (explicit `null`,
/// or a blank string for text fields), `Value` carries the replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Field<T> {
    Unset,
    Clear,
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Unset
    }
}

impl<'de, T> Deserialize<'de> for Field<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // only reached when the key is present; absence is `#[serde(default)]`
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Field::Value(value),
            None => Field::Clear,
        })
    }
}

impl<T> Field<T> {
    /// Resolve against the currently stored value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Field::Unset => current,
            Field::Clear => None,
            Field::Value(value) => Some(value),
        }
    }

    /// The value to store when creating a record, where there is nothing to keep.
    pub fn into_option(self) -> Option<T> {
        self.apply(None)
    }
}

impl Field<String> {
    /// Trim text; a value that is blank after trimming becomes `Clear`.
    pub fn trimmed(self) -> Field<String> {
        match self {
            Field::Value(value) => {
                let value = value.trim();
                if value.is_empty() {
                    Field::Clear
                } else {
                    Field::Value(value.to_string())
                }
            }
            other => other,
        }
    }
}

/// A user create/update body in canonical field names.
///
/// Built by [`crate::data::alias::canonicalize`], never straight from the wire.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UserPayload {
    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,
    #[validate(custom(function = "validate_password"))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom(function = "validate_college"))]
    pub college_name: Field<String>,
    #[validate(custom(function = "validate_year"))]
    pub year: Field<i32>,
    pub gender: Field<Gender>,
    #[validate(custom(function = "validate_link"))]
    pub linkedin_url: Field<String>,
    #[validate(custom(function = "validate_link"))]
    pub github_url: Field<String>,
    pub is_beginner: Option<bool>,
    /// Legacy comma-separated skill text.
    pub skills: Option<String>,
    #[validate(custom(function = "validate_skill_names"))]
    pub known_skills: Option<Vec<String>>,
    #[validate(custom(function = "validate_skill_names"))]
    pub desired_skills: Option<Vec<String>>,
    #[validate(nested)]
    pub hackathon_experiences: Option<Vec<ExperiencePayload>>,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ExperiencePayload {
    #[validate(length(max = 200))]
    pub organizer_name: Option<String>,
    #[validate(length(max = 200))]
    pub hackathon_name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub achievements: Option<String>,
}

/// A hackathon experience that passed the organizer/hackathon rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExperience {
    pub organizer_name: String,
    pub hackathon_name: String,
    pub description: Option<String>,
    pub achievements: Option<String>,
}

impl ExperiencePayload {
    /// `None` when organizer or hackathon name is blank; such entries are dropped.
    pub fn accepted(&self) -> Option<NewExperience> {
        let organizer_name = trimmed(&self.organizer_name)?;
        let hackathon_name = trimmed(&self.hackathon_name)?;

        Some(NewExperience {
            organizer_name,
            hackathon_name,
            description: trimmed(&self.description),
            achievements: trimmed(&self.achievements),
        })
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_SKILL_NAME_LENGTH: usize = 100;

fn validate_password(password: &String) -> Result<(), ValidationError> {
    // empty means "keep the current password" on update
    if !password.is_empty() && password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new("length"));
    }
    Ok(())
}

fn validate_college(college: &Field<String>) -> Result<(), ValidationError> {
    match college {
        Field::Value(value) if value.trim().chars().count() > 100 => {
            Err(ValidationError::new("length"))
        }
        _ => Ok(()),
    }
}

fn validate_year(year: &Field<i32>) -> Result<(), ValidationError> {
    match year {
        Field::Value(value) if !(0..=i32::from(i16::MAX)).contains(value) => {
            Err(ValidationError::new("range"))
        }
        _ => Ok(()),
    }
}

fn validate_link(link: &Field<String>) -> Result<(), ValidationError> {
    match link {
        Field::Value(value) if !value.trim().is_empty() => {
            let link = value.trim();
            if link.validate_url() && link.len() <= 200 {
                Ok(())
            } else {
                Err(ValidationError::new("url"))
            }
        }
        _ => Ok(()),
    }
}

fn validate_skill_names(names: &Vec<String>) -> Result<(), ValidationError> {
    if names
        .iter()
        .any(|name| name.trim().chars().count() > MAX_SKILL_NAME_LENGTH)
    {
        return Err(ValidationError::new("length"));
    }
    Ok(())
}
