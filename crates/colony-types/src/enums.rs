//! Enumeration types for the Colony controller.
//!
//! String values match the host's wire spelling so memory written by the
//! host-side script and snapshots captured from the console deserialize
//! without translation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Roles and FSM states
// ---------------------------------------------------------------------------

/// Behavioral category of a creep, stored in its memory as `role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Role {
    /// Mines sources and delivers energy to the base.
    Harvester,
    /// Moves energy from containers, storage and the floor to consumers.
    Carrier,
    /// Spends energy on construction sites.
    Builder,
    /// Hunts hostile creeps.
    Attacker,
    /// Any role string this build does not know about.
    #[serde(other)]
    Unrecognized,
}

impl Role {
    /// Every role the dispatcher can drive, in declaration order.
    pub const ALL: [Self; 4] = [Self::Harvester, Self::Carrier, Self::Builder, Self::Attacker];

    /// Wire spelling of the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Harvester => "harvester",
            Self::Carrier => "carrier",
            Self::Builder => "builder",
            Self::Attacker => "attacker",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of the per-creep finite state machine, stored in memory as `state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum CreepState {
    /// Looking for something to do.
    #[default]
    Idle,
    /// Walking toward the remembered target.
    Moving,
    /// Adjacent to the target and acting on it.
    Working,
    /// Topping up lifetime at a spawn.
    Renewing,
    /// Lifetime nearly spent; waiting for the host to remove the creep.
    Dying,
}

impl CreepState {
    /// Fixed message announced when a creep enters this state.
    pub const fn announcement(self) -> &'static str {
        match self {
            Self::Idle => "💤 idle",
            Self::Moving => "🚶 moving",
            Self::Working => "⚡ working",
            Self::Renewing => "🔄 renewing",
            Self::Dying => "💀 dying",
        }
    }
}

// ---------------------------------------------------------------------------
// Actions and queries
// ---------------------------------------------------------------------------

/// An action primitive a creep can issue through the world state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Verb {
    /// Step toward the target via the host's movement resolver.
    Move,
    /// Mine energy from a source.
    Harvest,
    /// Spend energy on a construction site.
    Build,
    /// Melee attack a creep or structure.
    Attack,
    /// Hand resources to a structure or creep.
    Transfer,
    /// Take resources out of a structure.
    Withdraw,
    /// Lift a dropped resource off the floor.
    Pickup,
    /// Ask a spawn to extend this creep's lifetime.
    Renew,
}

impl Verb {
    /// Whether the verb is channelled over several ticks against the same
    /// target (harvesting, building, fighting) rather than settled by a
    /// single successful call (transfer, withdraw, pickup).
    pub const fn is_channelled(self) -> bool {
        matches!(self, Self::Harvest | Self::Build | Self::Attack)
    }
}

/// Category of objects a room query can return.
///
/// Discriminants are the host's `FIND_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u32)]
pub enum FindCategory {
    /// All creeps owned by this player.
    MyCreeps = 102,
    /// Creeps owned by anybody else.
    HostileCreeps = 103,
    /// Sources with energy left.
    SourcesActive = 104,
    /// Every source.
    Sources = 105,
    /// Resources lying on the floor.
    DroppedResources = 106,
    /// Every structure, owned or not.
    Structures = 107,
    /// Construction sites.
    ConstructionSites = 111,
    /// Spawns owned by this player.
    MySpawns = 112,
    /// Mineral deposits.
    Minerals = 116,
    /// Tombstones of dead creeps.
    Tombstones = 118,
    /// Player flags.
    Flags = 110,
}

impl FindCategory {
    /// The host's numeric `FIND_*` constant.
    pub const fn host_constant(self) -> u32 {
        self as u32
    }
}

// ---------------------------------------------------------------------------
// Game vocabulary
// ---------------------------------------------------------------------------

/// Type of a structure or of the structure a construction site will become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum StructureType {
    /// Creates and renews creeps.
    Spawn,
    /// Extra spawning energy.
    Extension,
    /// Cheap movement surface.
    Road,
    /// Player-built wall (`constructedWall`).
    ConstructedWall,
    /// Protective cover.
    Rampart,
    /// Source keeper lair.
    KeeperLair,
    /// Inter-room portal.
    Portal,
    /// Room controller.
    Controller,
    /// Energy teleporter.
    Link,
    /// Large room-wide store.
    Storage,
    /// Defensive turret.
    Tower,
    /// Long-range room observer.
    Observer,
    /// Neutral power bank.
    PowerBank,
    /// Power processing spawn.
    PowerSpawn,
    /// Mineral extractor.
    Extractor,
    /// Reaction lab.
    Lab,
    /// Market terminal.
    Terminal,
    /// Unowned roadside store.
    Container,
    /// Nuke launcher.
    Nuker,
    /// Commodity factory.
    Factory,
    /// NPC invader core.
    InvaderCore,
    /// Any structure type this build does not know about.
    #[serde(other)]
    Other,
}

/// Kind of resource held in a store or lying on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ResourceKind {
    /// Energy, the only resource the roles move around.
    #[serde(rename = "energy")]
    Energy,
    /// Power.
    #[serde(rename = "power")]
    Power,
    /// Hydrogen.
    #[serde(rename = "H")]
    Hydrogen,
    /// Oxygen.
    #[serde(rename = "O")]
    Oxygen,
    /// Utrium.
    #[serde(rename = "U")]
    Utrium,
    /// Lemergium.
    #[serde(rename = "L")]
    Lemergium,
    /// Keanium.
    #[serde(rename = "K")]
    Keanium,
    /// Zynthium.
    #[serde(rename = "Z")]
    Zynthium,
    /// Catalyst.
    #[serde(rename = "X")]
    Catalyst,
    /// Ghodium.
    #[serde(rename = "G")]
    Ghodium,
    /// Compounds and commodities this build does not model.
    #[serde(other)]
    Other,
}

impl ResourceKind {
    /// Store key used by the host for this resource.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::Power => "power",
            Self::Hydrogen => "H",
            Self::Oxygen => "O",
            Self::Utrium => "U",
            Self::Lemergium => "L",
            Self::Keanium => "K",
            Self::Zynthium => "Z",
            Self::Catalyst => "X",
            Self::Ghodium => "G",
            Self::Other => "other",
        }
    }
}

/// A creep body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum BodyPart {
    /// Movement.
    Move,
    /// Harvesting, building, repairing.
    Work,
    /// 50 units of carry capacity.
    Carry,
    /// Melee damage.
    Attack,
    /// Ranged damage.
    RangedAttack,
    /// Extra hit points.
    Tough,
    /// Healing.
    Heal,
    /// Controller claiming.
    Claim,
}

impl BodyPart {
    /// Spawn energy cost of the part.
    pub const fn cost(self) -> u32 {
        match self {
            Self::Move | Self::Carry => 50,
            Self::Work => 100,
            Self::Attack => 80,
            Self::RangedAttack => 150,
            Self::Tough => 10,
            Self::Heal => 250,
            Self::Claim => 600,
        }
    }
}

/// Which backend a world state is reading from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldMode {
    /// The authoritative host.
    Live,
    /// A frozen snapshot replayed offline.
    Replay,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_is_unrecognized() {
        let role: Role = serde_json::from_str("\"upgrader\"").unwrap_or(Role::Harvester);
        assert_eq!(role, Role::Unrecognized);
    }

    #[test]
    fn role_wire_spelling() {
        let json = serde_json::to_string(&Role::Carrier).unwrap_or_default();
        assert_eq!(json, "\"carrier\"");
        assert_eq!(Role::Carrier.to_string(), "carrier");
    }

    #[test]
    fn structure_type_camel_case() {
        let wall: Result<StructureType, _> = serde_json::from_str("\"constructedWall\"");
        assert_eq!(wall.ok(), Some(StructureType::ConstructedWall));
        let lair: Result<StructureType, _> = serde_json::from_str("\"keeperLair\"");
        assert_eq!(lair.ok(), Some(StructureType::KeeperLair));
        let odd: Result<StructureType, _> = serde_json::from_str("\"scoreCollector\"");
        assert_eq!(odd.ok(), Some(StructureType::Other));
    }

    #[test]
    fn body_part_costs() {
        let body = [BodyPart::Work, BodyPart::Carry, BodyPart::Move];
        let total: u32 = body.iter().map(|p| p.cost()).sum();
        assert_eq!(total, 200);
        let ranged: Result<BodyPart, _> = serde_json::from_str("\"ranged_attack\"");
        assert_eq!(ranged.ok(), Some(BodyPart::RangedAttack));
    }

    #[test]
    fn find_constants_match_host() {
        assert_eq!(FindCategory::HostileCreeps.host_constant(), 103);
        assert_eq!(FindCategory::ConstructionSites.host_constant(), 111);
    }

    #[test]
    fn channelled_verbs() {
        assert!(Verb::Harvest.is_channelled());
        assert!(!Verb::Transfer.is_channelled());
    }
}
