use derive_more::{AsRef, Display};

/// Trimmed, non-empty title of a program or exercise.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub const MAX_LENGTH: usize = 64;

    pub fn new(name: &str) -> Result<Self, NameError> {
        let name = name.trim();
        match name.chars().count() {
            0 => Err(NameError::Empty),
            len if len > Self::MAX_LENGTH => Err(NameError::TooLong(len)),
            _ => Ok(Self(name.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("title must not be empty")]
    Empty,
    #[error("title must be {max} characters or fewer ({0} > {max})", max = Name::MAX_LENGTH)]
    TooLong(usize),
}
