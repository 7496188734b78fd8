//! Typed per-NPC flags with validated, heterogeneous storage.

use std::any::Any;
use std::collections::HashMap;

use crate::error::{NpcError, NpcResult};

fn accept_any<T>(_: &T) -> bool {
    true
}

/// A typed flag definition with a default value and an optional validator.
///
/// Flag definitions are `'static` descriptors; the values themselves live in
/// a per-NPC [`FlagSet`]. Two flags with the same key address the same slot.
pub struct NpcFlag<T: 'static> {
    key: &'static str,
    default: T,
    accepts: fn(&T) -> bool,
}

impl<T> NpcFlag<T> {
    /// Creates a flag that accepts every value of its type.
    #[must_use]
    pub const fn new(key: &'static str, default: T) -> Self {
        Self {
            key,
            default,
            accepts: accept_any::<T>,
        }
    }

    /// Restricts the flag to values for which `accepts` returns `true`.
    #[must_use]
    pub const fn with_validator(mut self, accepts: fn(&T) -> bool) -> Self {
        self.accepts = accepts;
        self
    }

    /// The storage key of this flag.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// The value an NPC reports before the flag was ever set.
    #[must_use]
    pub const fn default_value(&self) -> &T {
        &self.default
    }

    /// Whether `value` passes this flag's validator.
    #[must_use]
    pub fn accepts(&self, value: &T) -> bool {
        (self.accepts)(value)
    }
}

/// Heterogeneous storage for flag values, keyed by flag key.
#[derive(Default)]
pub struct FlagSet {
    values: HashMap<&'static str, Box<dyn Any + Send + Sync>>,
}

impl FlagSet {
    /// Creates an empty set; every flag reads as its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `flag`, rejecting it if the validator says no.
    ///
    /// # Errors
    ///
    /// Returns [`NpcError::InvalidFlagValue`] when the validator rejects the
    /// value; the previously stored value is kept.
    pub fn set<T>(&mut self, flag: &NpcFlag<T>, value: T) -> NpcResult<()>
    where
        T: Send + Sync + 'static,
    {
        if !flag.accepts(&value) {
            return Err(NpcError::InvalidFlagValue { flag: flag.key });
        }
        self.values.insert(flag.key, Box::new(value));
        Ok(())
    }

    /// Reads the stored value for `flag`, or the flag's default if unset.
    #[must_use]
    pub fn get<T>(&self, flag: &NpcFlag<T>) -> T
    where
        T: Clone + Send + Sync + 'static,
    {
        self.values
            .get(flag.key)
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .cloned()
            .unwrap_or_else(|| flag.default.clone())
    }

    /// Number of explicitly set flags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no flag was explicitly set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Mirror the yaw and pitch of nearby players back at them.
pub static LOOK_AT_PLAYER: NpcFlag<bool> = NpcFlag::new("imitate_player_look", false);

/// Swing the arm when a nearby player swings at the NPC.
pub static HIT_WHEN_PLAYER_HITS: NpcFlag<bool> = NpcFlag::new("imitate_player_hit", false);

/// Sneak and unsneak together with nearby players.
pub static SNEAK_WHEN_PLAYER_SNEAKS: NpcFlag<bool> = NpcFlag::new("imitate_player_sneak", false);

/// Overrides the tab-list display name; `None` shows the profile name.
pub static DISPLAY_NAME: NpcFlag<Option<String>> = NpcFlag::new("display_name", None);
