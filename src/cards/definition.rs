//! Card definitions - static card data.
//!
//! A `CardDefinition` holds the immutable properties of a card: its cost and
//! what it does when played. Runtime state (damage taken, attacks used) lives on
//! the board's `Minion`, `Hero` and `Weapon` values instead.
//!
//! Definitions are shared between boards as `Arc<CardDefinition>`, so board
//! clones never copy card text.

use serde::{Deserialize, Serialize};

/// Unique identifier for a card definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Minion keywords.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keywords {
    /// Enemies must attack this minion first.
    pub taunt: bool,
    /// Can attack the turn it is played.
    pub charge: bool,
    /// Cannot be attacked or targeted until it attacks.
    pub stealth: bool,
    /// Ignores the first instance of damage.
    pub divine_shield: bool,
    /// Bonus damage for the owner's spells.
    pub spell_damage: i32,
}

/// What a spell does when cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellEffect {
    /// Deal damage to one enemy character.
    Damage(i32),
    /// Deal damage to every enemy character.
    DamageAllEnemies(i32),
    /// Restore health to one friendly character.
    Heal(i32),
    /// Draw cards.
    DrawCards(u8),
    /// Give a friendly minion extra attack and health.
    Buff { attack: i32, health: i32 },
    /// Gain armor.
    GainArmor(i32),
}

/// Which characters a card or hero power may target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRule {
    /// Untargeted.
    None,
    /// Any enemy character that is not stealthed.
    EnemyCharacter,
    /// Any friendly character.
    FriendlyCharacter,
    /// Any friendly minion.
    FriendlyMinion,
}

impl SpellEffect {
    /// Targeting requirement for this effect.
    #[must_use]
    pub const fn target_rule(self) -> TargetRule {
        match self {
            SpellEffect::Damage(_) => TargetRule::EnemyCharacter,
            SpellEffect::Heal(_) => TargetRule::FriendlyCharacter,
            SpellEffect::Buff { .. } => TargetRule::FriendlyMinion,
            SpellEffect::DamageAllEnemies(_)
            | SpellEffect::DrawCards(_)
            | SpellEffect::GainArmor(_) => TargetRule::None,
        }
    }

    /// Whether spell damage bonuses apply.
    #[must_use]
    pub const fn is_damage(self) -> bool {
        matches!(self, SpellEffect::Damage(_) | SpellEffect::DamageAllEnemies(_))
    }
}

/// Card type with its type-specific data.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    /// Summons a minion.
    Minion {
        attack: i32,
        health: i32,
        keywords: Keywords,
    },
    /// One-shot effect.
    Spell(SpellEffect),
    /// Equips the hero.
    Weapon { attack: i32, durability: i32 },
    /// Hidden trap. Tracked on the board; its trigger is not modelled.
    Secret,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use ccg_search::cards::{CardDefinition, CardId, CardKind};
///
/// let boar = CardDefinition::minion(CardId::new(2), "Stonetusk Boar", 1, 1, 1).with_charge();
///
/// assert_eq!(boar.cost, 1);
/// assert!(boar.is_minion());
/// assert!(matches!(boar.kind, CardKind::Minion { keywords, .. } if keywords.charge));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name (for display/debugging).
    pub name: String,

    /// Mana cost.
    pub cost: u8,

    /// What the card does.
    pub kind: CardKind,
}

impl CardDefinition {
    /// Create a vanilla minion card.
    #[must_use]
    pub fn minion(id: CardId, name: impl Into<String>, cost: u8, attack: i32, health: i32) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            kind: CardKind::Minion {
                attack,
                health,
                keywords: Keywords::default(),
            },
        }
    }

    /// Create a spell card.
    #[must_use]
    pub fn spell(id: CardId, name: impl Into<String>, cost: u8, effect: SpellEffect) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            kind: CardKind::Spell(effect),
        }
    }

    /// Create a weapon card.
    #[must_use]
    pub fn weapon(id: CardId, name: impl Into<String>, cost: u8, attack: i32, durability: i32) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            kind: CardKind::Weapon { attack, durability },
        }
    }

    /// Create a secret card.
    #[must_use]
    pub fn secret(id: CardId, name: impl Into<String>, cost: u8) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            kind: CardKind::Secret,
        }
    }

    fn with_keywords(mut self, update: impl FnOnce(&mut Keywords)) -> Self {
        if let CardKind::Minion { keywords, .. } = &mut self.kind {
            update(keywords);
        }
        self
    }

    /// Add taunt (minions only).
    #[must_use]
    pub fn with_taunt(self) -> Self {
        self.with_keywords(|k| k.taunt = true)
    }

    /// Add charge (minions only).
    #[must_use]
    pub fn with_charge(self) -> Self {
        self.with_keywords(|k| k.charge = true)
    }

    /// Add stealth (minions only).
    #[must_use]
    pub fn with_stealth(self) -> Self {
        self.with_keywords(|k| k.stealth = true)
    }

    /// Add divine shield (minions only).
    #[must_use]
    pub fn with_divine_shield(self) -> Self {
        self.with_keywords(|k| k.divine_shield = true)
    }

    /// Add spell damage (minions only).
    #[must_use]
    pub fn with_spell_damage(self, amount: i32) -> Self {
        self.with_keywords(|k| k.spell_damage = amount)
    }

    #[must_use]
    pub fn is_minion(&self) -> bool {
        matches!(self.kind, CardKind::Minion { .. })
    }

    #[must_use]
    pub fn is_spell(&self) -> bool {
        matches!(self.kind, CardKind::Spell(_))
    }

    #[must_use]
    pub fn is_weapon(&self) -> bool {
        matches!(self.kind, CardKind::Weapon { .. })
    }

    /// Targeting requirement when played.
    #[must_use]
    pub fn target_rule(&self) -> TargetRule {
        match self.kind {
            CardKind::Spell(effect) => effect.target_rule(),
            _ => TargetRule::None,
        }
    }

    /// Minion keywords, if this is a minion card.
    #[must_use]
    pub fn keywords(&self) -> Option<Keywords> {
        match self.kind {
            CardKind::Minion { keywords, .. } => Some(keywords),
            _ => None,
        }
    }
}

impl std::fmt::Display for CardDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.cost)
    }
}
