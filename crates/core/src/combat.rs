//! Melee resolution between the player and a hostile character on the same cell.

use crate::entity::Vitals;

pub trait CombatResolver {
    fn fight(&mut self, player: &mut Vitals, enemy: &mut Vitals);
}

/// One blow each way per turn: the player strikes first and the enemy answers
/// only if it is still standing.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExchangeBlows;

impl CombatResolver for ExchangeBlows {
    fn fight(&mut self, player: &mut Vitals, enemy: &mut Vitals) {
        enemy.health -= player.damage;
        if !enemy.is_defeated() {
            player.health -= enemy.damage;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vitals(health: i32, damage: i32) -> Vitals {
        Vitals { health, health_max: health, regeneration: 0, damage }
    }

    #[test]
    fn surviving_enemy_strikes_back() {
        let (mut player, mut enemy) = (vitals(20, 3), vitals(10, 4));
        ExchangeBlows.fight(&mut player, &mut enemy);
        assert_eq!((player.health, enemy.health), (16, 7));
    }

    #[test]
    fn defeated_enemy_does_not_answer() {
        let (mut player, mut enemy) = (vitals(20, 11), vitals(10, 4));
        ExchangeBlows.fight(&mut player, &mut enemy);
        assert!(enemy.is_defeated());
        assert_eq!(player.health, 20);
    }

    #[test]
    fn zero_health_still_counts_as_standing() {
        let (mut player, mut enemy) = (vitals(20, 10), vitals(10, 4));
        ExchangeBlows.fight(&mut player, &mut enemy);
        assert!(!enemy.is_defeated());
        assert_eq!(player.health, 16);
    }
}
