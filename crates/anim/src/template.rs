use core::fmt;

use crate::AnimError;

/// Output format for an animated value: `?` is replaced by the number, so
/// `"?px"` renders `12.5` as `"12.5px"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template(String);

impl Template {
    /// # Errors
    /// Returns `AnimError::BadTemplate` when `pattern` has no `?`.
    pub fn new(pattern: &str) -> Result<Self, AnimError> {
        if pattern.contains('?') {
            Ok(Self(pattern.to_owned()))
        } else {
            Err(AnimError::BadTemplate(pattern.to_owned()))
        }
    }

    /// `"?<unit>"`, the shape every simple length uses.
    #[must_use]
    pub fn with_unit(unit: &str) -> Self {
        Self(format!("?{unit}"))
    }

    #[must_use]
    pub fn render(&self, value: f32) -> String {
        self.0.replace('?', &value.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Template {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
