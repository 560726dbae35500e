//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card definition available to a game and
//! hands out shared `Arc<CardDefinition>` handles for hands and decks.
//! `CardRegistry::basic()` provides the built-in card set used by
//! `BoardBuilder::standard` and the tests.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId, SpellEffect};

/// Well-known card ids of the basic set.
pub mod basic {
    use super::CardId;

    pub const WISP: CardId = CardId(1);
    pub const STONETUSK_BOAR: CardId = CardId(2);
    pub const MURLOC_RAIDER: CardId = CardId(3);
    pub const ARGENT_SQUIRE: CardId = CardId(4);
    pub const WORGEN_INFILTRATOR: CardId = CardId(5);
    pub const BLOODFEN_RAPTOR: CardId = CardId(6);
    pub const FROSTWOLF_GRUNT: CardId = CardId(7);
    pub const KOBOLD_GEOMANCER: CardId = CardId(8);
    pub const RIVER_CROCOLISK: CardId = CardId(9);
    pub const IRONFUR_GRIZZLY: CardId = CardId(10);
    pub const WOLFRIDER: CardId = CardId(11);
    pub const CHILLWIND_YETI: CardId = CardId(12);
    pub const SENJIN_SHIELDMASTA: CardId = CardId(13);
    pub const BOULDERFIST_OGRE: CardId = CardId(14);
    pub const MOONFIRE: CardId = CardId(15);
    pub const ARCANE_SHOT: CardId = CardId(16);
    pub const FIREBALL: CardId = CardId(17);
    pub const CONSECRATION: CardId = CardId(18);
    pub const HOLY_LIGHT: CardId = CardId(19);
    pub const ARCANE_INTELLECT: CardId = CardId(20);
    pub const BLESSING_OF_KINGS: CardId = CardId(21);
    pub const SHIELD_BLOCK: CardId = CardId(22);
    pub const FIERY_WAR_AXE: CardId = CardId(23);
    pub const ARCANITE_REAPER: CardId = CardId(24);
    pub const ICE_BARRIER: CardId = CardId(25);
}

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use ccg_search::cards::{basic, CardRegistry};
///
/// let registry = CardRegistry::basic();
/// let yeti = registry.get(basic::CHILLWIND_YETI).unwrap();
/// assert_eq!(yeti.name, "Chillwind Yeti");
/// assert_eq!(yeti.cost, 4);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, Arc<CardDefinition>>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in basic card set.
    #[must_use]
    pub fn basic() -> Self {
        use basic::*;

        let mut registry = Self::new();
        let cards = [
            CardDefinition::minion(WISP, "Wisp", 0, 1, 1),
            CardDefinition::minion(STONETUSK_BOAR, "Stonetusk Boar", 1, 1, 1).with_charge(),
            CardDefinition::minion(MURLOC_RAIDER, "Murloc Raider", 1, 2, 1),
            CardDefinition::minion(ARGENT_SQUIRE, "Argent Squire", 1, 1, 1).with_divine_shield(),
            CardDefinition::minion(WORGEN_INFILTRATOR, "Worgen Infiltrator", 1, 2, 1).with_stealth(),
            CardDefinition::minion(BLOODFEN_RAPTOR, "Bloodfen Raptor", 2, 3, 2),
            CardDefinition::minion(FROSTWOLF_GRUNT, "Frostwolf Grunt", 2, 2, 2).with_taunt(),
            CardDefinition::minion(KOBOLD_GEOMANCER, "Kobold Geomancer", 2, 2, 2).with_spell_damage(1),
            CardDefinition::minion(RIVER_CROCOLISK, "River Crocolisk", 2, 2, 3),
            CardDefinition::minion(IRONFUR_GRIZZLY, "Ironfur Grizzly", 3, 3, 3).with_taunt(),
            CardDefinition::minion(WOLFRIDER, "Wolfrider", 3, 3, 1).with_charge(),
            CardDefinition::minion(CHILLWIND_YETI, "Chillwind Yeti", 4, 4, 5),
            CardDefinition::minion(SENJIN_SHIELDMASTA, "Sen'jin Shieldmasta", 4, 3, 5).with_taunt(),
            CardDefinition::minion(BOULDERFIST_OGRE, "Boulderfist Ogre", 6, 6, 7),
            CardDefinition::spell(MOONFIRE, "Moonfire", 0, SpellEffect::Damage(1)),
            CardDefinition::spell(ARCANE_SHOT, "Arcane Shot", 1, SpellEffect::Damage(2)),
            CardDefinition::spell(FIREBALL, "Fireball", 4, SpellEffect::Damage(6)),
            CardDefinition::spell(CONSECRATION, "Consecration", 4, SpellEffect::DamageAllEnemies(2)),
            CardDefinition::spell(HOLY_LIGHT, "Holy Light", 2, SpellEffect::Heal(6)),
            CardDefinition::spell(ARCANE_INTELLECT, "Arcane Intellect", 3, SpellEffect::DrawCards(2)),
            CardDefinition::spell(
                BLESSING_OF_KINGS,
                "Blessing of Kings",
                4,
                SpellEffect::Buff { attack: 4, health: 4 },
            ),
            CardDefinition::spell(SHIELD_BLOCK, "Shield Block", 3, SpellEffect::GainArmor(5)),
            CardDefinition::weapon(FIERY_WAR_AXE, "Fiery War Axe", 3, 3, 2),
            CardDefinition::weapon(ARCANITE_REAPER, "Arcanite Reaper", 5, 5, 2),
            CardDefinition::secret(ICE_BARRIER, "Ice Barrier", 3),
        ];
        for card in cards {
            registry.register(card);
        }
        registry
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.cards.insert(card.id, Arc::new(card));
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Arc<CardDefinition>> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CardDefinition>> {
        let mut cards: Vec<_> = self.cards.values().collect();
        cards.sort_by_key(|c| c.id);
        cards.into_iter()
    }

    /// Build a deck from `(card, copies)` pairs, in list order.
    ///
    /// Unknown ids are skipped.
    #[must_use]
    pub fn deck(&self, list: &[(CardId, usize)]) -> Vec<Arc<CardDefinition>> {
        list.iter()
            .filter_map(|&(id, copies)| self.get(id).map(|card| (card, copies)))
            .flat_map(|(card, copies)| std::iter::repeat(Arc::clone(card)).take(copies))
            .collect()
    }

    /// A 30-card deck mixing every card type of the basic set.
    #[must_use]
    pub fn basic_deck(&self) -> Vec<Arc<CardDefinition>> {
        use basic::*;

        self.deck(&[
            (STONETUSK_BOAR, 2),
            (MURLOC_RAIDER, 2),
            (ARGENT_SQUIRE, 1),
            (WORGEN_INFILTRATOR, 1),
            (BLOODFEN_RAPTOR, 2),
            (FROSTWOLF_GRUNT, 2),
            (KOBOLD_GEOMANCER, 1),
            (RIVER_CROCOLISK, 2),
            (IRONFUR_GRIZZLY, 2),
            (WOLFRIDER, 1),
            (CHILLWIND_YETI, 2),
            (SENJIN_SHIELDMASTA, 2),
            (BOULDERFIST_OGRE, 1),
            (ARCANE_SHOT, 2),
            (FIREBALL, 1),
            (CONSECRATION, 1),
            (HOLY_LIGHT, 1),
            (ARCANE_INTELLECT, 1),
            (SHIELD_BLOCK, 1),
            (FIERY_WAR_AXE, 1),
            (ICE_BARRIER, 1),
        ])
    }
}
