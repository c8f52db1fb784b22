//! Tri-state field for partial updates.

use serde::{Deserialize, Deserializer};

/// A field of a partial-update payload.
///
/// JSON distinguishes a missing key from an explicit `null`; partial updates
/// need both. Use with `#[serde(default)]` so a missing key becomes
/// [`Patch::Absent`].
///
/// ```
/// use hactor_core::Patch;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Body {
///     #[serde(default)]
///     note: Patch<String>,
/// }
///
/// let absent: Body = serde_json::from_str("{}").unwrap();
/// assert_eq!(absent.note, Patch::Absent);
///
/// let null: Body = serde_json::from_str(r#"{"note":null}"#).unwrap();
/// assert_eq!(null.note, Patch::Null);
///
/// let set: Body = serde_json::from_str(r#"{"note":"hi"}"#).unwrap();
/// assert_eq!(set.note, Patch::Value("hi".to_owned()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Key not present: leave the stored value untouched.
    Absent,
    /// Explicit `null`: clear the stored value.
    Null,
    /// New value.
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Patch<T> {
    /// Returns `true` if the key was not present.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Converts `&Patch<T>` to `Patch<&T>`.
    #[must_use]
    pub const fn as_ref(&self) -> Patch<&T> {
        match self {
            Self::Absent => Patch::Absent,
            Self::Null => Patch::Null,
            Self::Value(v) => Patch::Value(v),
        }
    }

    /// `None` when absent, `Some(None)` when null, `Some(Some(v))` when set.
    #[must_use]
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Self::Absent => None,
            Self::Null => Some(None),
            Self::Value(v) => Some(Some(v)),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| value.map_or(Self::Null, Self::Value))
    }
}
