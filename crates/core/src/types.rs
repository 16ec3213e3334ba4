use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EntityId;
    pub struct ItemId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Glyph {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

/// Draw order for entities sharing a cell; later variants draw on top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderOrder {
    Corpse,
    Item,
    Actor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActorKind {
    Player,
    Infected,
    InfectedBrute,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKind {
    StimStick,
    ZipGun,
    ZipCannon,
    HandGrenade,
    HomingGrenade,
    NitroglynGrenade,
    HandGun,
    SmallMagazine,
    MediumMagazine,
    LargeMagazine,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    HostileSeen,
    PlayerHurt,
    PlayerDead,
    InfectedHurt,
    InfectedDead,
    ItemPickup,
    StimStick,
    Refused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageTone {
    Neutral,
    PlayerAttack,
    EnemyAttack,
    PlayerDied,
    EnemyDied,
    Impossible,
    ToleranceReduced,
    ToleranceIncreased,
    HealthRecovered,
}

/// Notifications for the presentation layer. The simulation never reads these back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    Message { text: String, tone: MessageTone },
    Sound(SoundCue),
    Highlight { pos: Pos, color: Rgb },
}
