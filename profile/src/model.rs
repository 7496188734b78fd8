//! Profile identity records.

use std::fmt;

use uuid::Uuid;

use crate::error::{ResolveError, ResolveResult};

/// One signed (or unsigned) profile property, typically the `textures` blob.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileProperty {
    pub name: String,
    pub value: String,
    pub signature: Option<String>,
}

impl ProfileProperty {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            signature: None,
        }
    }

    /// Property carrying a server-issued signature. Texture data is only
    /// accepted by clients when signed.
    #[must_use]
    pub fn signed(
        name: impl Into<String>,
        value: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            signature: Some(signature.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum ProfileKey {
    Name(String),
    Id(Uuid),
}

/// An unresolved profile: exactly one of name or unique id is known.
///
/// Construction validates the key, so a `Profile` in hand is always
/// resolvable in principle. Resolution fills in the other half and the
/// property set, yielding a [`ResolvedProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    key: ProfileKey,
}

impl Profile {
    /// Profile keyed by player name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::EmptyName`] when the name is empty.
    pub fn by_name(name: impl Into<String>) -> ResolveResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ResolveError::EmptyName);
        }
        Ok(Self {
            key: ProfileKey::Name(name),
        })
    }

    /// Profile keyed by unique id.
    #[must_use]
    pub const fn by_id(id: Uuid) -> Self {
        Self {
            key: ProfileKey::Id(id),
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.key {
            ProfileKey::Name(name) => Some(name),
            ProfileKey::Id(_) => None,
        }
    }

    #[must_use]
    pub const fn unique_id(&self) -> Option<Uuid> {
        match &self.key {
            ProfileKey::Name(_) => None,
            ProfileKey::Id(id) => Some(*id),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            ProfileKey::Name(name) => write!(f, "name {name}"),
            ProfileKey::Id(id) => write!(f, "id {id}"),
        }
    }
}

/// A fully resolved profile: name, unique id, and the property set.
///
/// Both halves of the identity are always present; the property set may be
/// empty (an unskinned profile is still valid).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedProfile {
    name: String,
    unique_id: Uuid,
    properties: Vec<ProfileProperty>,
}

impl ResolvedProfile {
    /// # Errors
    ///
    /// Returns [`ResolveError::EmptyName`] when the name is empty.
    pub fn new(name: impl Into<String>, unique_id: Uuid) -> ResolveResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ResolveError::EmptyName);
        }
        Ok(Self {
            name,
            unique_id,
            properties: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_property(mut self, property: ProfileProperty) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unique_id(&self) -> Uuid {
        self.unique_id
    }

    #[must_use]
    pub fn properties(&self) -> &[ProfileProperty] {
        &self.properties
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&ProfileProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// `true` when this resolved profile answers the given key.
    #[must_use]
    pub fn matches(&self, profile: &Profile) -> bool {
        match &profile.key {
            ProfileKey::Name(name) => self.name == *name,
            ProfileKey::Id(id) => self.unique_id == *id,
        }
    }
}
