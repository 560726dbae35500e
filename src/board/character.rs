//! Heroes, minions, weapons and hero powers.
//!
//! These are the runtime pieces on a `Board`. Static card text stays in the
//! shared `CardDefinition`; everything here is per-game mutable state.

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::cards::{CardDefinition, CardId, Keywords, TargetRule};
use crate::core::PlayerId;

/// Starting and maximum hero health.
pub const STARTING_HEALTH: i32 = 30;

/// Mana cost of every hero power.
pub const HERO_POWER_COST: u8 = 2;

/// Board-unique minion identifier. Never reused within a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MinionId(pub u32);

impl std::fmt::Display for MinionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Minion({})", self.0)
    }
}

/// Anything that can attack or be targeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Character {
    Hero(PlayerId),
    Minion(MinionId),
}

impl Character {
    #[must_use]
    pub fn is_hero(self) -> bool {
        matches!(self, Character::Hero(_))
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Character::Hero(player) => write!(f, "Hero({player})"),
            Character::Minion(id) => write!(f, "{id}"),
        }
    }
}

/// An equipped weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Weapon {
    pub attack: i32,
    pub durability: i32,
}

/// Hero powers, one per class. Cost 2, once per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroPower {
    /// Mage: deal 1 damage.
    Fireblast,
    /// Warrior: gain 2 armor.
    ArmorUp,
    /// Priest: restore 2 health.
    LesserHeal,
    /// Hunter: deal 2 damage to the enemy hero.
    SteadyShot,
    /// Rogue: equip a 1/2 dagger.
    DaggerMastery,
    /// Paladin: summon a 1/1 recruit.
    Reinforce,
    /// Druid: +1 attack this turn and 1 armor.
    Shapeshift,
    /// Warlock: draw a card and take 2 damage.
    LifeTap,
    /// Shaman: summon a 0/2 taunt totem.
    TotemicCall,
}

impl HeroPower {
    /// Targeting requirement of this power.
    #[must_use]
    pub const fn target_rule(self) -> TargetRule {
        match self {
            HeroPower::Fireblast => TargetRule::EnemyCharacter,
            HeroPower::LesserHeal => TargetRule::FriendlyCharacter,
            _ => TargetRule::None,
        }
    }

    /// Whether the power puts a minion on the board.
    #[must_use]
    pub const fn summons(self) -> bool {
        matches!(self, HeroPower::Reinforce | HeroPower::TotemicCall)
    }

    /// Token minion summoned by this power, if any.
    #[must_use]
    pub fn token(self) -> Option<Arc<CardDefinition>> {
        static RECRUIT: OnceLock<Arc<CardDefinition>> = OnceLock::new();
        static TOTEM: OnceLock<Arc<CardDefinition>> = OnceLock::new();

        match self {
            HeroPower::Reinforce => Some(Arc::clone(RECRUIT.get_or_init(|| {
                Arc::new(CardDefinition::minion(
                    CardId::new(1001),
                    "Silver Hand Recruit",
                    1,
                    1,
                    1,
                ))
            }))),
            HeroPower::TotemicCall => Some(Arc::clone(TOTEM.get_or_init(|| {
                Arc::new(
                    CardDefinition::minion(CardId::new(1002), "Stoneclaw Totem", 1, 0, 2)
                        .with_taunt(),
                )
            }))),
            _ => None,
        }
    }
}

/// A player's hero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hero {
    pub health: i32,
    pub max_health: i32,
    pub armor: i32,
    pub weapon: Option<Weapon>,
    /// Attack granted until end of turn.
    pub temp_attack: i32,
    /// Whether the hero attacked this turn.
    pub attacked: bool,
    pub power: HeroPower,
    pub power_used: bool,
}

impl Hero {
    #[must_use]
    pub fn new(power: HeroPower) -> Self {
        Self {
            health: STARTING_HEALTH,
            max_health: STARTING_HEALTH,
            armor: 0,
            weapon: None,
            temp_attack: 0,
            attacked: false,
            power,
            power_used: false,
        }
    }

    /// Current attack value (weapon plus temporary bonus).
    #[must_use]
    pub fn attack(&self) -> i32 {
        self.weapon.map_or(0, |w| w.attack) + self.temp_attack
    }

    #[must_use]
    pub fn can_attack(&self) -> bool {
        !self.attacked && self.attack() > 0
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Health plus armor.
    #[must_use]
    pub fn effective_health(&self) -> i32 {
        self.health + self.armor
    }

    /// Apply damage, armor first.
    pub fn take_damage(&mut self, amount: i32) {
        let absorbed = amount.min(self.armor);
        self.armor -= absorbed;
        self.health -= amount - absorbed;
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}

/// A minion in play.
#[derive(Clone, Debug)]
pub struct Minion {
    pub id: MinionId,
    pub card: Arc<CardDefinition>,
    pub attack: i32,
    pub health: i32,
    pub max_health: i32,
    pub keywords: Keywords,
    /// Attacks made this turn.
    pub attacks_made: u8,
    /// Played this turn and without charge.
    pub summoning_sick: bool,
}

impl Minion {
    /// Summon a minion from its card. Returns `None` for non-minion cards.
    #[must_use]
    pub fn summon(id: MinionId, card: Arc<CardDefinition>) -> Option<Self> {
        let crate::cards::CardKind::Minion {
            attack,
            health,
            keywords,
        } = card.kind
        else {
            return None;
        };
        Some(Self {
            id,
            card,
            attack,
            health,
            max_health: health,
            keywords,
            attacks_made: 0,
            summoning_sick: !keywords.charge,
        })
    }

    #[must_use]
    pub fn can_attack(&self) -> bool {
        self.attack > 0 && self.attacks_made == 0 && (!self.summoning_sick || self.keywords.charge)
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Apply damage. Divine shield absorbs one non-zero hit.
    pub fn take_damage(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        if self.keywords.divine_shield {
            self.keywords.divine_shield = false;
        } else {
            self.health -= amount;
        }
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Mana cost of the card this minion came from.
    #[must_use]
    pub fn cost(&self) -> u8 {
        self.card.cost
    }
}

impl std::fmt::Display for Minion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}/{}", self.card.name, self.attack, self.health)
    }
}
