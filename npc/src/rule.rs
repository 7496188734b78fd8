//! Per-NPC tracking and presentation policy.

use std::fmt;
use std::sync::Arc;

use profile::ResolvedProfile;
use proto::PlayerId;

use crate::npc::Npc;

/// Decides which players an NPC may be shown to.
#[derive(Clone, Default)]
pub enum TrackingRule {
    /// Every player is eligible.
    #[default]
    AllPlayers,
    /// Only players on the NPC's include list are eligible.
    OnlyIncluded,
    /// Arbitrary predicate over NPC and player.
    Custom(Arc<dyn Fn(&Npc, PlayerId) -> bool + Send + Sync>),
}

impl TrackingRule {
    /// Whether `player` may be shown `npc` under this rule.
    #[must_use]
    pub fn accepts(&self, npc: &Npc, player: PlayerId) -> bool {
        match self {
            Self::AllPlayers => true,
            Self::OnlyIncluded => npc.is_included(player),
            Self::Custom(predicate) => predicate(npc, player),
        }
    }
}

impl fmt::Debug for TrackingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllPlayers => f.write_str("AllPlayers"),
            Self::OnlyIncluded => f.write_str("OnlyIncluded"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Picks the profile a given viewer is shown.
///
/// A per-viewer profile must keep the NPC's unique id; the hide transition
/// keys the player-info remove on it.
#[derive(Clone, Default)]
pub enum ProfileStrategy {
    /// Every viewer sees the NPC's own resolved profile.
    #[default]
    OwnProfile,
    /// Per-viewer override, e.g. mirrored names or skins.
    PerViewer(Arc<dyn Fn(&Npc, PlayerId) -> ResolvedProfile + Send + Sync>),
}

impl ProfileStrategy {
    /// The profile `player` is shown for `npc`.
    #[must_use]
    pub fn profile_for(&self, npc: &Npc, player: PlayerId) -> ResolvedProfile {
        match self {
            Self::OwnProfile => npc.profile().clone(),
            Self::PerViewer(pick) => pick(npc, player),
        }
    }
}

impl fmt::Debug for ProfileStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnProfile => f.write_str("OwnProfile"),
            Self::PerViewer(_) => f.write_str("PerViewer(..)"),
        }
    }
}

/// Construction-time NPC settings.
#[derive(Debug, Clone, Default)]
pub struct NpcSettings {
    /// Who this NPC may be shown to.
    pub rule: TrackingRule,
    /// Which profile each viewer is shown.
    pub profile_strategy: ProfileStrategy,
}

impl NpcSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the tracking rule.
    #[must_use]
    pub fn with_rule(mut self, rule: TrackingRule) -> Self {
        self.rule = rule;
        self
    }

    /// Replaces the profile strategy.
    #[must_use]
    pub fn with_profile_strategy(mut self, strategy: ProfileStrategy) -> Self {
        self.profile_strategy = strategy;
        self
    }
}
