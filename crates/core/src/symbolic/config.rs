use thiserror::Error;

/// The first index used when deriving element names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexBase {
    Zero,
    #[default]
    One,
}

impl IndexBase {
    fn offset(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }
}

/// Configuration for naming the scalar elements of a collected symbolic array.
///
/// Element names are built as `base{sep}i{sep}j…`, for example `A_1_2` with
/// the default separator and one-based indices.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamingConfig {
    separator: String,
    base: IndexBase,
}

/// Errors that can occur when validating a naming config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("separator must not be empty")]
    EmptySeparator,

    #[error("separator must not contain whitespace")]
    WhitespaceSeparator,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            separator: String::from("_"),
            base: IndexBase::One,
        }
    }
}

impl NamingConfig {
    /// Creates a new config with a validated separator.
    ///
    /// # Errors
    ///
    /// Returns an error if the separator is empty or contains whitespace.
    pub fn new(separator: impl Into<String>, base: IndexBase) -> Result<Self, ConfigError> {
        let separator = separator.into();
        if separator.is_empty() {
            return Err(ConfigError::EmptySeparator);
        }
        if separator.chars().any(char::is_whitespace) {
            return Err(ConfigError::WhitespaceSeparator);
        }

        Ok(Self { separator, base })
    }

    /// Returns the separator placed between the base name and each index.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Returns the index base.
    #[must_use]
    pub fn base(&self) -> IndexBase {
        self.base
    }

    /// Derives the name of the element at `index` within the array named `base`.
    #[must_use]
    pub fn element_name(&self, base: &str, index: &[usize]) -> String {
        let offset = self.base.offset();
        let mut name = String::from(base);
        for i in index {
            name.push_str(&self.separator);
            name.push_str(&(i + offset).to_string());
        }
        name
    }
}
