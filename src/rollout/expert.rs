//! Rule-based rollout policy.
//!
//! Works through a fixed priority list and takes the first applicable
//! action. Every action is picked from `LegalActions`, so it always applies.

use serde::{Deserialize, Serialize};

use super::DefaultPolicy;
use crate::board::{Board, Character, HeroPower, Minion, MAX_HAND_SIZE};
use crate::cards::{CardKind, SpellEffect};
use crate::core::GameRng;
use crate::moves::{LegalActions, SingleMove};

/// Priority-list rollout policy.
///
/// 1. Defensive card (taunt minion, heal, armor) when the enemy board
///    threatens lethal within `danger_margin`
/// 2. Affordable cards, most expensive first, with sensible targets
/// 3. Favorable trades into taunts, then any attack into a taunt
/// 4. Favorable trades into dangerous minions
///    (attack - health >= `dangerous_threshold`)
/// 5. Minion attacks to the face
/// 6. Hero power, per-power rules
/// 7. Hero (weapon) attack
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertPolicy {
    pub danger_margin: i32,
    pub dangerous_threshold: i32,
}

impl Default for ExpertPolicy {
    fn default() -> Self {
        Self {
            danger_margin: 3,
            dangerous_threshold: 2,
        }
    }
}

fn minion(board: &Board, character: Character) -> Option<&Minion> {
    match character {
        Character::Minion(id) => board.find_minion(id).map(|(_, _, m)| m),
        Character::Hero(_) => None,
    }
}

/// Attacker kills the target and survives.
fn is_favorable(attacker: &Minion, target: &Minion) -> bool {
    let kills = attacker.attack >= target.health && !target.keywords.divine_shield;
    let survives = attacker.health > target.attack || attacker.keywords.divine_shield;
    kills && survives
}

fn attack_parts(action: &SingleMove) -> Option<(Character, Character)> {
    match *action {
        SingleMove::DirectAttack { attacker, target } => Some((attacker, target)),
        _ => None,
    }
}

impl ExpertPolicy {
    #[must_use]
    pub fn new(danger_margin: i32, dangerous_threshold: i32) -> Self {
        Self {
            danger_margin,
            dangerous_threshold,
        }
    }

    fn in_danger(&self, board: &Board) -> bool {
        let me = board.current_player();
        let threat = board.side(me.opponent()).board_damage();
        threat + self.danger_margin >= board.hero(me).effective_health()
    }

    fn defensive_play(&self, board: &Board, legal: &LegalActions) -> Option<SingleMove> {
        if !self.in_danger(board) {
            return None;
        }
        let me = board.current_player();
        let hand = &board.side(me).hand;
        legal.card_plays.iter().copied().find(|action| {
            let SingleMove::PlayCard {
                hand_index, target, ..
            } = *action
            else {
                return false;
            };
            let Some(card) = hand.get(hand_index) else {
                return false;
            };
            match card.kind {
                CardKind::Minion { keywords, .. } => keywords.taunt,
                CardKind::Spell(SpellEffect::Heal(_)) => target == Some(Character::Hero(me)),
                CardKind::Spell(SpellEffect::GainArmor(_)) => true,
                _ => false,
            }
        })
    }

    fn card_play(&self, board: &Board, legal: &LegalActions) -> Option<SingleMove> {
        let me = board.current_player();
        let side = board.side(me);
        let spell_bonus = side.spell_damage();

        let mut indices: Vec<usize> = board.playable_cards();
        indices.sort_by_key(|&i| std::cmp::Reverse(side.hand.get(i).map_or(0, |c| c.cost)));

        for hand_index in indices {
            let Some(card) = side.hand.get(hand_index) else {
                continue;
            };
            let options: Vec<(Option<Character>, usize)> = legal
                .card_plays
                .iter()
                .filter_map(|action| match *action {
                    SingleMove::PlayCard {
                        hand_index: i,
                        target,
                        slot,
                        ..
                    } if i == hand_index => Some((target, slot)),
                    _ => None,
                })
                .collect();
            let play = |target: Option<Character>, slot: usize| SingleMove::PlayCard {
                hand_index,
                card: card.id,
                slot,
                target,
            };

            let choice = match card.kind {
                // Append to the right end of the board.
                CardKind::Minion { .. } => options.iter().max_by_key(|(_, slot)| *slot).copied(),
                CardKind::Weapon { attack, .. } => {
                    let current = side.hero.weapon.map_or(0, |w| w.attack);
                    (attack > current).then(|| options.first().copied()).flatten()
                }
                CardKind::Secret => options.first().copied(),
                CardKind::Spell(effect) => match effect {
                    SpellEffect::Damage(amount) => {
                        let damage = amount + spell_bonus;
                        // Best kill, otherwise face.
                        options
                            .iter()
                            .filter(|(target, _)| {
                                target
                                    .and_then(|t| minion(board, t))
                                    .is_some_and(|m| m.health <= damage && !m.keywords.divine_shield)
                            })
                            .max_by_key(|(target, _)| {
                                target.and_then(|t| minion(board, t)).map_or(0, |m| m.attack)
                            })
                            .or_else(|| {
                                options
                                    .iter()
                                    .find(|(target, _)| target.is_some_and(|t| t.is_hero()))
                            })
                            .copied()
                    }
                    SpellEffect::DamageAllEnemies(_) => {
                        let enemies = board.minions(me.opponent()).len();
                        (enemies >= 2).then(|| options.first().copied()).flatten()
                    }
                    SpellEffect::Heal(amount) => {
                        let hero = board.hero(me);
                        if hero.max_health - hero.health >= amount / 2 {
                            options
                                .iter()
                                .find(|(target, _)| *target == Some(Character::Hero(me)))
                                .copied()
                        } else {
                            options
                                .iter()
                                .filter_map(|&(target, slot)| {
                                    let m = target.and_then(|t| minion(board, t))?;
                                    (m.health < m.max_health)
                                        .then_some((m.max_health - m.health, (target, slot)))
                                })
                                .max_by_key(|(missing, _)| *missing)
                                .map(|(_, option)| option)
                        }
                    }
                    SpellEffect::DrawCards(count) => (side.hand.len() + usize::from(count)
                        <= MAX_HAND_SIZE)
                        .then(|| options.first().copied())
                        .flatten(),
                    SpellEffect::Buff { .. } => options
                        .iter()
                        .max_by_key(|(target, _)| {
                            target.and_then(|t| minion(board, t)).map_or(0, |m| m.attack)
                        })
                        .copied(),
                    SpellEffect::GainArmor(_) => options.first().copied(),
                },
            };

            if let Some((target, slot)) = choice {
                return Some(play(target, slot));
            }
        }
        None
    }

    fn taunt_trade(&self, board: &Board, legal: &LegalActions) -> Option<SingleMove> {
        let into_taunt: Vec<SingleMove> = legal
            .minion_attacks
            .iter()
            .chain(&legal.hero_attacks)
            .copied()
            .filter(|action| {
                attack_parts(action)
                    .and_then(|(_, target)| minion(board, target))
                    .is_some_and(|m| m.keywords.taunt)
            })
            .collect();

        into_taunt
            .iter()
            .copied()
            .find(|action| self.is_favorable_attack(board, action))
            .or_else(|| into_taunt.first().copied())
    }

    fn dangerous_trade(&self, board: &Board, legal: &LegalActions) -> Option<SingleMove> {
        legal.minion_attacks.iter().copied().find(|action| {
            let dangerous = attack_parts(action)
                .and_then(|(_, target)| minion(board, target))
                .is_some_and(|m| m.attack - m.health >= self.dangerous_threshold);
            dangerous && self.is_favorable_attack(board, action)
        })
    }

    fn is_favorable_attack(&self, board: &Board, action: &SingleMove) -> bool {
        let Some((attacker, target)) = attack_parts(action) else {
            return false;
        };
        match (minion(board, attacker), minion(board, target)) {
            (Some(a), Some(t)) => is_favorable(a, t),
            // A hero attacking a minion: kill it without dying.
            (None, Some(t)) => {
                let hero = board.hero(board.current_player());
                hero.attack() >= t.health && hero.effective_health() > t.attack
            }
            _ => false,
        }
    }

    fn face(&self, legal: &LegalActions) -> Option<SingleMove> {
        legal.minion_attacks.iter().copied().find(|action| {
            attack_parts(action).is_some_and(|(_, target)| target.is_hero())
        })
    }

    fn hero_power(&self, board: &Board, legal: &LegalActions) -> Option<SingleMove> {
        let me = board.current_player();
        let side = board.side(me);
        let power_on = |target: Option<Character>| {
            legal
                .hero_powers
                .iter()
                .copied()
                .find(|action| *action == SingleMove::UseHeroPower { target })
        };

        match side.hero.power {
            HeroPower::Fireblast => {
                let pick = board
                    .minions(me.opponent())
                    .iter()
                    .filter(|m| m.health == 1 && !m.keywords.divine_shield && !m.keywords.stealth)
                    .max_by_key(|m| m.attack)
                    .map(|m| Character::Minion(m.id))
                    .unwrap_or(Character::Hero(me.opponent()));
                power_on(Some(pick))
            }
            HeroPower::LesserHeal => {
                let hero = &side.hero;
                if hero.health < hero.max_health {
                    return power_on(Some(Character::Hero(me)));
                }
                side.minions
                    .iter()
                    .filter(|m| m.health < m.max_health)
                    .max_by_key(|m| m.max_health - m.health)
                    .and_then(|m| power_on(Some(Character::Minion(m.id))))
            }
            HeroPower::DaggerMastery if side.hero.weapon.is_some() => None,
            HeroPower::LifeTap
                if side.hero.health <= 10 || side.hand.len() >= MAX_HAND_SIZE =>
            {
                None
            }
            _ => power_on(None),
        }
    }

    fn weapon_attack(&self, board: &Board, legal: &LegalActions) -> Option<SingleMove> {
        legal
            .hero_attacks
            .iter()
            .copied()
            .find(|action| attack_parts(action).is_some_and(|(_, target)| target.is_hero()))
            .or_else(|| {
                legal
                    .hero_attacks
                    .iter()
                    .copied()
                    .find(|action| self.is_favorable_attack(board, action))
            })
    }
}

impl DefaultPolicy for ExpertPolicy {
    fn next_action(&self, board: &Board, _rng: &mut GameRng) -> Option<SingleMove> {
        let legal = LegalActions::of(board);
        if legal.is_empty() {
            return None;
        }
        self.defensive_play(board, &legal)
            .or_else(|| self.card_play(board, &legal))
            .or_else(|| self.taunt_trade(board, &legal))
            .or_else(|| self.dangerous_trade(board, &legal))
            .or_else(|| self.face(&legal))
            .or_else(|| self.hero_power(board, &legal))
            .or_else(|| self.weapon_attack(board, &legal))
    }
}
