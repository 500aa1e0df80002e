//! Interaction between bobs sharing a cell.

use crate::bob::Bob;
use std::fmt;

/// Decides what happens when a bob meets another bob on its cell.
///
/// The simulation asks the rule once per co-located pair, attacker first.
/// Returning true destroys the defender.
pub trait CombatRule: Send + Sync + fmt::Debug {
    fn engage(&self, attacker: &mut Bob, defender: &mut Bob) -> bool;
}

/// Bobs never harm each other.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pacifist;

impl CombatRule for Pacifist {
    fn engage(&self, _attacker: &mut Bob, _defender: &mut Bob) -> bool {
        false
    }
}
