//! Game rules: applying actions, turn transitions, terminal scoring and
//! legal-action queries.
//!
//! Every action is validated completely before the board is touched, so a
//! rejected action leaves the board exactly as it was.

use std::sync::Arc;

use log::{debug, warn};

use super::character::{Character, HeroPower, Minion, MinionId, Weapon, HERO_POWER_COST};
use super::state::{Board, MAX_HAND_SIZE, MAX_MANA};
use crate::cards::{CardDefinition, CardId, CardKind, SpellEffect, TargetRule};
use crate::core::{GameError, PlayerId};
use crate::moves::{Move, SingleMove};

impl Board {
    // === Terminal state ===

    /// Whether either hero is dead.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        PlayerId::both().any(|p| self.hero(p).is_dead())
    }

    /// Whether `player` has won: own hero alive, enemy hero dead.
    #[must_use]
    pub fn has_won(&self, player: PlayerId) -> bool {
        !self.hero(player).is_dead() && self.hero(player.opponent()).is_dead()
    }

    /// Terminal score for `player`.
    ///
    /// `0.0` if the player's hero is dead, otherwise `turn_penalty^turn`, so
    /// faster wins score higher.
    pub fn score(&self, turn_penalty: f64, player: PlayerId) -> Result<f64, GameError> {
        if !self.is_game_over() {
            return Err(GameError::NotTerminal);
        }
        if self.hero(player).is_dead() {
            return Ok(0.0);
        }
        Ok(turn_penalty.powi(self.turn as i32))
    }

    // === Turn structure ===

    /// End the current turn and start the opponent's.
    pub fn end_turn(&mut self) {
        self.players[self.current].hero.temp_attack = 0;
        self.current = self.current.opponent();
        self.turn += 1;
        self.start_turn();
    }

    /// Start-of-turn bookkeeping for the current player: gain a mana crystal,
    /// refill mana, draw, and refresh attacks and the hero power.
    pub(crate) fn start_turn(&mut self) {
        let player = self.current;
        let side = &mut self.players[player];
        side.max_mana = (side.max_mana + 1).min(MAX_MANA);
        side.mana = side.max_mana;
        side.hero.attacked = false;
        side.hero.power_used = false;
        for minion in side.minions.iter_mut() {
            minion.attacks_made = 0;
            minion.summoning_sick = false;
        }
        self.draw_card(player);
    }

    /// Draw the top card. An empty deck deals increasing fatigue damage; a
    /// full hand burns the card.
    pub(crate) fn draw_card(&mut self, player: PlayerId) {
        let side = &mut self.players[player];
        match side.deck.pop_front() {
            Some(card) => {
                if side.hand.len() < MAX_HAND_SIZE {
                    side.hand.push_back(card);
                }
            }
            None => {
                side.fatigue += 1;
                let damage = side.fatigue;
                side.hero.take_damage(damage);
            }
        }
    }

    // === Applying moves ===

    /// Apply every action of a move in order.
    ///
    /// Actions that fail are skipped (and logged at `warn` when `log` is
    /// set). Stops early once the game is over. Returns the number of actions
    /// applied.
    pub fn apply_moves(&mut self, mv: &Move, log: bool) -> usize {
        if log {
            if mv.is_empty() {
                debug!("{} passes on turn {}", self.current, self.turn);
            } else {
                debug!("{} plays [{mv}] on turn {}", self.current, self.turn);
            }
        }
        let mut applied = 0;
        for action in mv.actions() {
            if self.is_game_over() {
                break;
            }
            match self.apply_single(action) {
                Ok(()) => applied += 1,
                Err(err) => {
                    if log {
                        warn!("skipping {action} of [{mv}]: {err}; board: {self}");
                    }
                }
            }
        }
        applied
    }

    /// Apply one atomic action for the current player.
    pub fn apply_single(&mut self, action: &SingleMove) -> Result<(), GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        match *action {
            SingleMove::PlayCard {
                hand_index,
                card,
                slot,
                target,
            } => self.play_card(hand_index, card, slot, target),
            SingleMove::DirectAttack { attacker, target } => self.attack(attacker, target),
            SingleMove::UseHeroPower { target } => self.use_hero_power(target),
        }
    }

    fn play_card(
        &mut self,
        hand_index: usize,
        expected: CardId,
        slot: usize,
        target: Option<Character>,
    ) -> Result<(), GameError> {
        let me = self.current;
        let side = &self.players[me];
        let card = side
            .hand
            .get(hand_index)
            .cloned()
            .ok_or(GameError::NoSuchCard(hand_index))?;
        if card.id != expected {
            return Err(GameError::CardMismatch {
                index: hand_index,
                expected,
                found: card.id,
            });
        }
        if card.cost > side.mana {
            return Err(GameError::NotEnoughMana {
                need: card.cost,
                have: side.mana,
            });
        }
        if card.is_minion() {
            if side.is_board_full() {
                return Err(GameError::BoardFull);
            }
            if slot > side.minions.len() {
                return Err(GameError::InvalidSlot(slot));
            }
        }
        self.check_target(card.target_rule(), target)?;

        let side = &mut self.players[me];
        side.mana -= card.cost;
        side.hand.remove(hand_index);

        match card.kind {
            CardKind::Minion { .. } => self.summon(me, Arc::clone(&card), slot),
            CardKind::Spell(effect) => self.cast(me, effect, target),
            CardKind::Weapon { attack, durability } => {
                self.players[me].hero.weapon = Some(Weapon { attack, durability });
            }
            CardKind::Secret => self.players[me].secrets.push_back(Arc::clone(&card)),
        }
        self.remove_dead();
        Ok(())
    }

    fn summon(&mut self, player: PlayerId, card: Arc<CardDefinition>, slot: usize) {
        let id = self.allocate_minion_id();
        if let Some(minion) = Minion::summon(id, card) {
            let minions = &mut self.players[player].minions;
            let slot = slot.min(minions.len());
            minions.insert(slot, minion);
        }
    }

    fn cast(&mut self, player: PlayerId, effect: SpellEffect, target: Option<Character>) {
        let bonus = self.players[player].spell_damage();
        match effect {
            SpellEffect::Damage(amount) => {
                if let Some(target) = target {
                    self.damage(target, amount + bonus);
                }
            }
            SpellEffect::DamageAllEnemies(amount) => {
                let enemy = player.opponent();
                let ids: Vec<MinionId> = self.minions(enemy).iter().map(|m| m.id).collect();
                for id in ids {
                    self.damage(Character::Minion(id), amount + bonus);
                }
                self.damage(Character::Hero(enemy), amount + bonus);
            }
            SpellEffect::Heal(amount) => {
                if let Some(target) = target {
                    self.heal(target, amount);
                }
            }
            SpellEffect::DrawCards(count) => {
                for _ in 0..count {
                    self.draw_card(player);
                }
            }
            SpellEffect::Buff { attack, health } => {
                if let Some(Character::Minion(id)) = target {
                    if let Some(minion) = self.minion_mut(id) {
                        minion.attack += attack;
                        minion.health += health;
                        minion.max_health += health;
                    }
                }
            }
            SpellEffect::GainArmor(amount) => self.players[player].hero.armor += amount,
        }
    }

    fn attack(&mut self, attacker: Character, target: Character) -> Result<(), GameError> {
        let me = self.current;
        let enemy = me.opponent();

        // Attacker must be ours and ready.
        let attack_value = match attacker {
            Character::Hero(player) => {
                let hero = self.hero(player);
                if player != me || !hero.can_attack() {
                    return Err(GameError::CannotAttack(attacker));
                }
                hero.attack()
            }
            Character::Minion(id) => {
                let (owner, _, minion) = self
                    .find_minion(id)
                    .ok_or(GameError::NoSuchMinion(attacker))?;
                if owner != me || !minion.can_attack() {
                    return Err(GameError::CannotAttack(attacker));
                }
                minion.attack
            }
        };

        // Target must be a visible enemy, and taunts come first.
        let counter = match target {
            Character::Hero(player) => {
                if player != enemy {
                    return Err(GameError::InvalidTarget(Some(target)));
                }
                if self.players[enemy].has_taunt() {
                    return Err(GameError::TauntInTheWay(target));
                }
                0
            }
            Character::Minion(id) => {
                let (owner, _, minion) = self
                    .find_minion(id)
                    .ok_or(GameError::NoSuchMinion(target))?;
                if owner != enemy || minion.keywords.stealth {
                    return Err(GameError::InvalidTarget(Some(target)));
                }
                if !minion.keywords.taunt && self.players[enemy].has_taunt() {
                    return Err(GameError::TauntInTheWay(target));
                }
                minion.attack
            }
        };

        self.damage(target, attack_value);
        // Heroes never strike back.
        if !target.is_hero() {
            self.damage(attacker, counter);
        }

        match attacker {
            Character::Hero(player) => {
                let hero = &mut self.players[player].hero;
                hero.attacked = true;
                if let Some(weapon) = hero.weapon.as_mut() {
                    weapon.durability -= 1;
                    if weapon.durability <= 0 {
                        hero.weapon = None;
                    }
                }
            }
            Character::Minion(id) => {
                if let Some(minion) = self.minion_mut(id) {
                    minion.attacks_made += 1;
                    minion.keywords.stealth = false;
                }
            }
        }
        self.remove_dead();
        Ok(())
    }

    fn use_hero_power(&mut self, target: Option<Character>) -> Result<(), GameError> {
        let me = self.current;
        let side = &self.players[me];
        let power = side.hero.power;
        if side.hero.power_used {
            return Err(GameError::HeroPowerUsed);
        }
        if side.mana < HERO_POWER_COST {
            return Err(GameError::NotEnoughMana {
                need: HERO_POWER_COST,
                have: side.mana,
            });
        }
        if power.summons() && side.is_board_full() {
            return Err(GameError::BoardFull);
        }
        self.check_target(power.target_rule(), target)?;

        let side = &mut self.players[me];
        side.mana -= HERO_POWER_COST;
        side.hero.power_used = true;

        match power {
            HeroPower::Fireblast => {
                if let Some(target) = target {
                    self.damage(target, 1);
                }
            }
            HeroPower::LesserHeal => {
                if let Some(target) = target {
                    self.heal(target, 2);
                }
            }
            HeroPower::ArmorUp => self.players[me].hero.armor += 2,
            HeroPower::SteadyShot => self.damage(Character::Hero(me.opponent()), 2),
            HeroPower::DaggerMastery => {
                self.players[me].hero.weapon = Some(Weapon {
                    attack: 1,
                    durability: 2,
                });
            }
            HeroPower::Shapeshift => {
                let hero = &mut self.players[me].hero;
                hero.temp_attack += 1;
                hero.armor += 1;
            }
            HeroPower::LifeTap => {
                self.draw_card(me);
                self.damage(Character::Hero(me), 2);
            }
            HeroPower::Reinforce | HeroPower::TotemicCall => {
                if let Some(token) = power.token() {
                    let slot = self.minions(me).len();
                    self.summon(me, token, slot);
                }
            }
        }
        self.remove_dead();
        Ok(())
    }

    // === Effects ===

    fn minion_mut(&mut self, id: MinionId) -> Option<&mut Minion> {
        let (owner, index, _) = self.find_minion(id)?;
        self.players[owner].minions.get_mut(index)
    }

    fn damage(&mut self, target: Character, amount: i32) {
        match target {
            Character::Hero(player) => self.players[player].hero.take_damage(amount),
            Character::Minion(id) => {
                if let Some(minion) = self.minion_mut(id) {
                    minion.take_damage(amount);
                }
            }
        }
    }

    fn heal(&mut self, target: Character, amount: i32) {
        match target {
            Character::Hero(player) => self.players[player].hero.heal(amount),
            Character::Minion(id) => {
                if let Some(minion) = self.minion_mut(id) {
                    minion.heal(amount);
                }
            }
        }
    }

    fn remove_dead(&mut self) {
        for (_, side) in self.players.iter_mut() {
            side.minions.retain(|m| !m.is_dead());
        }
    }

    // === Legal-action queries ===

    fn check_target(&self, rule: TargetRule, target: Option<Character>) -> Result<(), GameError> {
        let legal = match (rule, target) {
            (TargetRule::None, None) => true,
            (TargetRule::None, Some(_)) | (_, None) => false,
            (rule, Some(target)) => self.targets(rule).contains(&target),
        };
        if legal {
            Ok(())
        } else {
            Err(GameError::InvalidTarget(target))
        }
    }

    /// Characters the current player may pick under `rule`.
    #[must_use]
    pub fn targets(&self, rule: TargetRule) -> Vec<Character> {
        let me = self.current;
        let enemy = me.opponent();
        match rule {
            TargetRule::None => Vec::new(),
            TargetRule::EnemyCharacter => std::iter::once(Character::Hero(enemy))
                .chain(
                    self.minions(enemy)
                        .iter()
                        .filter(|m| !m.keywords.stealth)
                        .map(|m| Character::Minion(m.id)),
                )
                .collect(),
            TargetRule::FriendlyCharacter => std::iter::once(Character::Hero(me))
                .chain(self.minions(me).iter().map(|m| Character::Minion(m.id)))
                .collect(),
            TargetRule::FriendlyMinion => {
                self.minions(me).iter().map(|m| Character::Minion(m.id)).collect()
            }
        }
    }

    /// Choices for a target slot: `[None]` when untargeted, otherwise every
    /// legal target (possibly none).
    fn target_options(&self, rule: TargetRule) -> Vec<Option<Character>> {
        match rule {
            TargetRule::None => vec![None],
            rule => self.targets(rule).into_iter().map(Some).collect(),
        }
    }

    /// Current player's characters that can still attack: hero first, then
    /// minions in board order.
    #[must_use]
    pub fn attackers(&self) -> Vec<Character> {
        let me = self.current;
        let hero = self
            .hero(me)
            .can_attack()
            .then_some(Character::Hero(me));
        hero.into_iter()
            .chain(
                self.minions(me)
                    .iter()
                    .filter(|m| m.can_attack())
                    .map(|m| Character::Minion(m.id)),
            )
            .collect()
    }

    /// Enemy characters an attack may hit. Visible taunts restrict the
    /// choice to themselves; stealthed minions are excluded.
    #[must_use]
    pub fn attack_targets(&self) -> Vec<Character> {
        let enemy = self.opponent();
        if self.players[enemy].has_taunt() {
            return self
                .minions(enemy)
                .iter()
                .filter(|m| m.keywords.taunt && !m.keywords.stealth)
                .map(|m| Character::Minion(m.id))
                .collect();
        }
        self.targets(TargetRule::EnemyCharacter)
    }

    /// Hand indices the current player can play right now.
    #[must_use]
    pub fn playable_cards(&self) -> Vec<usize> {
        let side = &self.players[self.current];
        side.hand
            .iter()
            .enumerate()
            .filter(|(_, card)| card.cost <= side.mana)
            .filter(|(_, card)| !(card.is_minion() && side.is_board_full()))
            .filter(|(_, card)| {
                card.target_rule() == TargetRule::None || !self.targets(card.target_rule()).is_empty()
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Target choices for the card at `hand_index`. Empty if the index is
    /// out of range or the card has no legal target.
    #[must_use]
    pub fn card_targets(&self, hand_index: usize) -> Vec<Option<Character>> {
        match self.players[self.current].hand.get(hand_index) {
            Some(card) => self.target_options(card.target_rule()),
            None => Vec::new(),
        }
    }

    /// Slots a new minion may be placed in for the current player.
    #[must_use]
    pub fn minion_slots(&self) -> Vec<usize> {
        let side = &self.players[self.current];
        if side.is_board_full() {
            return Vec::new();
        }
        (0..=side.minions.len()).collect()
    }

    #[must_use]
    pub fn can_use_hero_power(&self) -> bool {
        let side = &self.players[self.current];
        !side.hero.power_used
            && side.mana >= HERO_POWER_COST
            && !(side.hero.power.summons() && side.is_board_full())
            && !self.hero_power_targets().is_empty()
    }

    /// Target choices for the current player's hero power.
    #[must_use]
    pub fn hero_power_targets(&self) -> Vec<Option<Character>> {
        self.target_options(self.hero(self.current).power.target_rule())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardBuilder;
    use crate::cards::{basic, CardRegistry};

    const ME: PlayerId = PlayerId::FIRST;
    const THEM: PlayerId = PlayerId::SECOND;

    fn registry() -> CardRegistry {
        CardRegistry::basic()
    }

    fn play(hand_index: usize, card: CardId, target: Option<Character>) -> SingleMove {
        SingleMove::PlayCard {
            hand_index,
            card,
            slot: 0,
            target,
        }
    }

    #[test]
    fn test_score_requires_terminal() {
        let board = BoardBuilder::new().build();
        assert_eq!(board.score(0.97, ME), Err(GameError::NotTerminal));
    }

    #[test]
    fn test_score_values() {
        let mut board = BoardBuilder::new().turn(3).build();
        board.side_mut(THEM).hero.health = 0;

        assert!(board.is_game_over());
        assert!(board.has_won(ME));
        assert!(!board.has_won(THEM));
        assert_eq!(board.score(0.97, THEM), Ok(0.0));

        let expected = 0.97f64.powi(3);
        assert!((board.score(0.97, ME).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_logged_pass_leaves_board_untouched() {
        let mut board = BoardBuilder::new().build();
        let before = board.fingerprint();

        assert_eq!(board.apply_moves(&Move::empty(), true), 0);
        assert_eq!(board.fingerprint(), before);
    }

    #[test]
    fn test_charge_minion_lethal() {
        let reg = registry();
        let mut board = BoardBuilder::new()
            .mana(ME, 1)
            .hand(ME, vec![reg.get(basic::STONETUSK_BOAR).unwrap().clone()])
            .health(THEM, 1)
            .build();

        board.apply_single(&play(0, basic::STONETUSK_BOAR, None)).unwrap();
        let boar = Character::Minion(board.minions(ME)[0].id);
        board
            .apply_single(&SingleMove::DirectAttack {
                attacker: boar,
                target: Character::Hero(THEM),
            })
            .unwrap();

        assert!(board.has_won(ME));
        assert_eq!(board.side(ME).mana, 0);
    }

    #[test]
    fn test_rejected_action_leaves_board_untouched() {
        let reg = registry();
        let mut board = BoardBuilder::new()
            .mana(ME, 3)
            .hand(ME, vec![reg.get(basic::FIREBALL).unwrap().clone()])
            .build();
        let before = board.fingerprint();

        let err = board
            .apply_single(&play(0, basic::FIREBALL, Some(Character::Hero(THEM))))
            .unwrap_err();

        assert_eq!(err, GameError::NotEnoughMana { need: 4, have: 3 });
        assert_eq!(board.fingerprint(), before);
    }

    #[test]
    fn test_card_mismatch() {
        let reg = registry();
        let mut board = BoardBuilder::new()
            .mana(ME, 5)
            .hand(ME, vec![reg.get(basic::WISP).unwrap().clone()])
            .build();

        let err = board.apply_single(&play(0, basic::FIREBALL, None)).unwrap_err();
        assert!(matches!(err, GameError::CardMismatch { index: 0, .. }));
        assert_eq!(
            board.apply_single(&play(3, basic::WISP, None)),
            Err(GameError::NoSuchCard(3))
        );
    }

    #[test]
    fn test_taunt_blocks_face() {
        let reg = registry();
        let mut board = BoardBuilder::new()
            .minion(ME, reg.get(basic::CHILLWIND_YETI).unwrap())
            .minion(THEM, reg.get(basic::FROSTWOLF_GRUNT).unwrap())
            .build();
        let yeti = Character::Minion(board.minions(ME)[0].id);
        let grunt = Character::Minion(board.minions(THEM)[0].id);

        assert_eq!(board.attack_targets(), vec![grunt]);
        assert_eq!(
            board.apply_single(&SingleMove::DirectAttack {
                attacker: yeti,
                target: Character::Hero(THEM),
            }),
            Err(GameError::TauntInTheWay(Character::Hero(THEM)))
        );

        board
            .apply_single(&SingleMove::DirectAttack {
                attacker: yeti,
                target: grunt,
            })
            .unwrap();

        assert!(board.minions(THEM).is_empty());
        assert_eq!(board.minions(ME)[0].health, 3);
        assert!(board.attackers().is_empty());
    }

    #[test]
    fn test_stealth_hides_minion() {
        let reg = registry();
        let board = BoardBuilder::new()
            .minion(THEM, reg.get(basic::WORGEN_INFILTRATOR).unwrap())
            .build();

        assert_eq!(board.attack_targets(), vec![Character::Hero(THEM)]);
        assert_eq!(board.targets(TargetRule::EnemyCharacter).len(), 1);
    }

    #[test]
    fn test_weapon_attack_uses_durability() {
        let mut board = BoardBuilder::new().weapon(ME, 3, 1).build();

        board
            .apply_single(&SingleMove::DirectAttack {
                attacker: Character::Hero(ME),
                target: Character::Hero(THEM),
            })
            .unwrap();

        assert_eq!(board.hero(THEM).health, 27);
        assert!(board.hero(ME).weapon.is_none());
        assert!(board.hero(ME).attacked);
    }

    #[test]
    fn test_hero_takes_counter_damage() {
        let reg = registry();
        let mut board = BoardBuilder::new()
            .weapon(ME, 3, 2)
            .minion(THEM, reg.get(basic::RIVER_CROCOLISK).unwrap())
            .build();
        let croc = Character::Minion(board.minions(THEM)[0].id);

        board
            .apply_single(&SingleMove::DirectAttack {
                attacker: Character::Hero(ME),
                target: croc,
            })
            .unwrap();

        assert!(board.minions(THEM).is_empty());
        assert_eq!(board.hero(ME).health, 28);
    }

    #[test]
    fn test_spell_damage_bonus() {
        let reg = registry();
        let mut board = BoardBuilder::new()
            .mana(ME, 1)
            .minion(ME, reg.get(basic::KOBOLD_GEOMANCER).unwrap())
            .hand(ME, vec![reg.get(basic::ARCANE_SHOT).unwrap().clone()])
            .build();

        board
            .apply_single(&play(0, basic::ARCANE_SHOT, Some(Character::Hero(THEM))))
            .unwrap();

        assert_eq!(board.hero(THEM).health, 27);
    }

    #[test]
    fn test_consecration_hits_all_enemies() {
        let reg = registry();
        let mut board = BoardBuilder::new()
            .mana(ME, 4)
            .minion(THEM, reg.get(basic::WISP).unwrap())
            .minion(THEM, reg.get(basic::CHILLWIND_YETI).unwrap())
            .hand(ME, vec![reg.get(basic::CONSECRATION).unwrap().clone()])
            .build();

        board.apply_single(&play(0, basic::CONSECRATION, None)).unwrap();

        assert_eq!(board.minions(THEM).len(), 1);
        assert_eq!(board.minions(THEM)[0].health, 3);
        assert_eq!(board.hero(THEM).health, 28);
    }

    #[test]
    fn test_targeted_spell_requires_target() {
        let reg = registry();
        let mut board = BoardBuilder::new()
            .mana(ME, 4)
            .hand(ME, vec![reg.get(basic::BLESSING_OF_KINGS).unwrap().clone()])
            .build();

        assert!(board.playable_cards().is_empty());
        assert!(board.card_targets(0).is_empty());
        assert_eq!(
            board.apply_single(&play(0, basic::BLESSING_OF_KINGS, None)),
            Err(GameError::InvalidTarget(None))
        );
    }

    #[test]
    fn test_end_turn_refreshes() {
        let reg = registry();
        let deck = vec![reg.get(basic::WISP).unwrap().clone()];
        let mut board = BoardBuilder::new()
            .mana(THEM, 2)
            .deck(THEM, deck)
            .minion(THEM, reg.get(basic::CHILLWIND_YETI).unwrap())
            .build();
        board.side_mut(THEM).hero.power_used = true;

        board.end_turn();

        assert_eq!(board.current_player(), THEM);
        assert_eq!(board.turn(), 1);
        let side = board.side(THEM);
        assert_eq!(side.max_mana, 3);
        assert_eq!(side.mana, 3);
        assert_eq!(side.hand.len(), 1);
        assert!(!side.hero.power_used);
        assert!(side.minions[0].can_attack());
    }

    #[test]
    fn test_fatigue_grows() {
        let mut board = BoardBuilder::new().build();

        board.draw_card(ME);
        board.draw_card(ME);
        board.draw_card(ME);

        assert_eq!(board.hero(ME).health, 30 - 1 - 2 - 3);
    }

    #[test]
    fn test_overdraw_burns() {
        let reg = registry();
        let wisp = reg.get(basic::WISP).unwrap().clone();
        let mut board = BoardBuilder::new()
            .hand(ME, vec![wisp.clone(); MAX_HAND_SIZE])
            .deck(ME, vec![wisp])
            .build();

        board.draw_card(ME);

        assert_eq!(board.side(ME).hand.len(), MAX_HAND_SIZE);
        assert!(board.side(ME).deck.is_empty());
    }

    #[test]
    fn test_mana_caps_at_ten() {
        let mut board = BoardBuilder::new().mana(THEM, MAX_MANA).build();
        board.end_turn();
        assert_eq!(board.side(THEM).max_mana, MAX_MANA);
    }

    #[test]
    fn test_hero_power_once_per_turn() {
        let mut board = BoardBuilder::new()
            .hero_power(ME, HeroPower::SteadyShot)
            .mana(ME, 4)
            .build();

        assert!(board.can_use_hero_power());
        assert_eq!(board.hero_power_targets(), vec![None]);

        board
            .apply_single(&SingleMove::UseHeroPower { target: None })
            .unwrap();

        assert_eq!(board.hero(THEM).health, 28);
        assert!(!board.can_use_hero_power());
        assert_eq!(
            board.apply_single(&SingleMove::UseHeroPower { target: None }),
            Err(GameError::HeroPowerUsed)
        );
    }

    #[test]
    fn test_totemic_call_summons_taunt() {
        let mut board = BoardBuilder::new()
            .hero_power(ME, HeroPower::TotemicCall)
            .mana(ME, 2)
            .build();

        board
            .apply_single(&SingleMove::UseHeroPower { target: None })
            .unwrap();

        assert_eq!(board.minions(ME).len(), 1);
        assert!(board.side(ME).has_taunt());
    }

    #[test]
    fn test_actions_rejected_after_game_over() {
        let mut board = BoardBuilder::new().mana(ME, 10).build();
        board.side_mut(THEM).hero.health = 0;

        assert_eq!(
            board.apply_single(&SingleMove::UseHeroPower { target: None }),
            Err(GameError::GameOver)
        );
    }

    #[test]
    fn test_apply_moves_skips_failures() {
        let reg = registry();
        let mut board = BoardBuilder::new()
            .mana(ME, 1)
            .hand(ME, vec![reg.get(basic::WISP).unwrap().clone()])
            .build();

        let mv = Move::empty()
            .then(play(0, basic::FIREBALL, Some(Character::Hero(THEM))))
            .then(play(0, basic::WISP, None));

        assert_eq!(board.apply_moves(&mv, false), 1);
        assert_eq!(board.minions(ME).len(), 1);
    }
}
