//! Routing profiles: opaque identifiers selecting the network mode.

use thiserror::Error;

/// An opaque routing-mode identifier (e.g. `foot`, `bike`, `car`).
///
/// The engine never interprets the profile; it is validated once here and
/// passed through unchanged to the network oracle.
///
/// # Examples
/// ```
/// use meander_core::Profile;
///
/// # fn main() -> Result<(), meander_core::ProfileError> {
/// let profile = Profile::new("foot")?;
/// assert_eq!(profile.as_str(), "foot");
/// assert!(Profile::new("").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile(String);

/// Errors returned by [`Profile::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// The profile string was empty.
    #[error("profile must not be empty")]
    Empty,
    /// The profile contained a character outside `[A-Za-z0-9_-]`.
    #[error("profile {profile:?} contains invalid character {character:?}")]
    InvalidCharacter {
        /// The rejected profile string.
        profile: String,
        /// The first offending character.
        character: char,
    },
}

impl Profile {
    /// Validate and construct a profile identifier.
    ///
    /// Accepts ASCII alphanumerics, `_` and `-`; anything else is rejected
    /// before it can reach a query string.
    pub fn new(profile: impl Into<String>) -> Result<Self, ProfileError> {
        let profile = profile.into();
        if profile.is_empty() {
            return Err(ProfileError::Empty);
        }
        if let Some(character) = profile
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(ProfileError::InvalidCharacter { profile, character });
        }
        Ok(Self(profile))
    }

    /// The validated identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("foot")]
    #[case("bike")]
    #[case("car_fastest")]
    #[case("hike-2")]
    fn accepts_well_formed_profiles(#[case] input: &str) {
        let profile = Profile::new(input).expect("profile should validate");
        assert_eq!(profile.as_str(), input);
    }

    #[rstest]
    #[case("", ProfileError::Empty)]
    #[case("foot walking", ProfileError::InvalidCharacter { profile: "foot walking".into(), character: ' ' })]
    #[case("foot/fast", ProfileError::InvalidCharacter { profile: "foot/fast".into(), character: '/' })]
    fn rejects_malformed_profiles(#[case] input: &str, #[case] expected: ProfileError) {
        assert_eq!(Profile::new(input).expect_err("should reject"), expected);
    }
}
