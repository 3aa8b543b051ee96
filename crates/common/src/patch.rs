//! Presence-tracked fields for partial updates.

use serde::{Deserialize, Deserializer};

/// A field in a partial update body.
///
/// Use with `#[serde(default)]` so a missing key deserialises to
/// [`Patch::Unset`] while an explicit `null` becomes [`Patch::Null`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Key was absent; leave the stored value untouched.
    #[default]
    Unset,
    /// Key was present with `null`.
    Null,
    /// Key was present with a value.
    Set(T),
}

impl<T> Patch<T> {
    /// Borrow the value, if one was set.
    #[must_use]
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }

    /// Convert into the update to apply to a nullable column.
    ///
    /// `None` means "leave untouched"; `Some(None)` means "clear".
    #[must_use]
    pub fn into_nullable(self) -> Option<Option<T>> {
        match self {
            Self::Unset => None,
            Self::Null => Some(None),
            Self::Set(v) => Some(Some(v)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Set)
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
        Option::<T>::deserialize(deserializer).map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        name: Patch<String>,
        #[serde(default)]
        description: Patch<String>,
    }

    #[test]
    fn test_missing_null_and_set_are_distinct() {
        let body: Body = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(body.name, Patch::Unset);
        assert_eq!(body.description, Patch::Null);

        let body: Body = serde_json::from_str(r#"{"name": "Docs"}"#).unwrap();
        assert_eq!(body.name, Patch::Set("Docs".to_string()));
        assert_eq!(body.description, Patch::Unset);
    }

    #[test]
    fn test_into_nullable() {
        assert_eq!(Patch::<i32>::Unset.into_nullable(), None);
        assert_eq!(Patch::<i32>::Null.into_nullable(), Some(None));
        assert_eq!(Patch::Set(3).into_nullable(), Some(Some(3)));
    }
}
