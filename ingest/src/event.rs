pub type Tick = u64;

/// Stable per-demo player key. Slots are assigned by the decoder and never
/// change for the lifetime of one demo file, even across side swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct PlayerSlot(pub i32);

/// Game-assigned entity id. Only unique within one demo file. Negative ids
/// are reserved for synthetic spans minted by the ingestor (flash blinds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct EntityId(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Team {
    T,
    Ct,
}

impl Team {
    pub fn from_number(number: i32) -> Option<Self> {
        match number {
            2 => Some(Self::T),
            3 => Some(Self::Ct),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::T => "T",
            Self::Ct => "CT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EndReason {
    StillInProgress,
    BombExploded,
    TSaved,
    BombDefused,
    TKilled,
    CtKilled,
    Draw,
    HostageRescued,
    TimeRanOut,
    GameStart,
    TSurrender,
    CtSurrender,
    Truncated,
}

// https://github.com/markus-wa/demoinfocs-golang/blob/205b0bb25e9f3e96e1d306d154199b4a6292940e/pkg/demoinfocs/events/events.go#L53
pub static ROUND_END_REASON: phf::Map<i32, EndReason> = phf::phf_map! {
    0_i32 => EndReason::StillInProgress,
    1_i32 => EndReason::BombExploded,
    4_i32 => EndReason::TSaved,
    7_i32 => EndReason::BombDefused,
    8_i32 => EndReason::TKilled,
    9_i32 => EndReason::CtKilled,
    10_i32 => EndReason::Draw,
    11_i32 => EndReason::HostageRescued,
    12_i32 => EndReason::TimeRanOut,
    16_i32 => EndReason::GameStart,
    17_i32 => EndReason::TSurrender,
    18_i32 => EndReason::CtSurrender,
};

impl EndReason {
    /// Winner implied by the reason alone, for streams whose round-end
    /// payload carries no explicit winner.
    pub fn winner(&self) -> Option<Team> {
        match self {
            Self::BombExploded | Self::CtKilled | Self::CtSurrender => Some(Team::T),
            Self::BombDefused
            | Self::TKilled
            | Self::TSaved
            | Self::TimeRanOut
            | Self::HostageRescued
            | Self::TSurrender => Some(Team::Ct),
            Self::StillInProgress | Self::Draw | Self::GameStart | Self::Truncated => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GrenadeKind {
    HeGrenade,
    Flashbang,
    Smoke,
    Molotov,
    Incendiary,
    Decoy,
}

impl GrenadeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeGrenade => "hegrenade",
            Self::Flashbang => "flashbang",
            Self::Smoke => "smokegrenade",
            Self::Molotov => "molotov",
            Self::Incendiary => "incendiary",
            Self::Decoy => "decoy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BombEventKind {
    Planted,
    Defused,
    Exploded,
    Dropped,
    PickedUp,
}

impl BombEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planted => "planted",
            Self::Defused => "defused",
            Self::Exploded => "exploded",
            Self::Dropped => "dropped",
            Self::PickedUp => "picked_up",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EconomyKind {
    Purchase,
    Pickup,
    Drop,
    Award,
}

impl EconomyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Pickup => "pickup",
            Self::Drop => "drop",
            Self::Award => "award",
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayerMeta {
    pub slot: PlayerSlot,
    pub platform_id: u64,
    pub name: String,
    pub team: Option<Team>,
}

/// One element of the decoder's output sequence. Ticks are non-decreasing;
/// violations are anomalies the segmenter recovers from by clamping.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    pub tick: Tick,
    pub event: Event,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Event {
    PlayerJoin(PlayerMeta),
    PlayerTeamChange {
        player: PlayerSlot,
        team: Option<Team>,
    },
    PlayerSnapshot {
        player: PlayerSlot,
        position: Vec3,
        health: i32,
        armor: i32,
        money: i32,
    },
    MatchStart {
        map: Option<String>,
        game_mode: Option<String>,
    },
    RoundStart,
    RoundEnd {
        winner: Option<Team>,
        reason: EndReason,
    },
    Kill {
        attacker: Option<PlayerSlot>,
        victim: PlayerSlot,
        assister: Option<PlayerSlot>,
        weapon: String,
        headshot: bool,
        penetrated: i32,
        noscope: bool,
        through_smoke: bool,
        attacker_blind: bool,
    },
    Damage {
        attacker: Option<PlayerSlot>,
        victim: PlayerSlot,
        health_removed: i32,
        armor_removed: i32,
        hitgroup: i32,
        weapon: String,
    },
    WeaponFire {
        player: PlayerSlot,
        weapon: String,
        silenced: bool,
    },
    GrenadeThrown {
        entity: EntityId,
        player: PlayerSlot,
        grenade: GrenadeKind,
        position: Vec3,
    },
    GrenadeSample {
        entity: EntityId,
        position: Vec3,
    },
    GrenadeDetonate {
        entity: EntityId,
        position: Vec3,
    },
    SmokeStart {
        entity: EntityId,
        player: Option<PlayerSlot>,
        position: Vec3,
    },
    SmokeExpired {
        entity: EntityId,
    },
    InfernoStart {
        entity: EntityId,
        player: Option<PlayerSlot>,
        position: Vec3,
    },
    InfernoExpired {
        entity: EntityId,
    },
    PlayerBlind {
        player: PlayerSlot,
        attacker: Option<PlayerSlot>,
        duration_ticks: Tick,
    },
    ItemDropped {
        entity: EntityId,
        player: Option<PlayerSlot>,
        item: String,
    },
    ItemPickedUp {
        entity: EntityId,
        player: PlayerSlot,
    },
    Bomb {
        player: Option<PlayerSlot>,
        kind: BombEventKind,
        site: Option<i32>,
    },
    ChatMessage {
        player: PlayerSlot,
        text: String,
        team_only: bool,
    },
    RadioCommand {
        player: PlayerSlot,
        command: String,
    },
    VoiceTransmission {
        player: PlayerSlot,
        duration_ms: u32,
    },
    EconomyEvent {
        player: PlayerSlot,
        kind: EconomyKind,
        item: Option<String>,
        amount: i32,
    },
}
