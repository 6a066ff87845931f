//! End-of-match team tally
//!
//! Dead characters stay in the roster, so the tally can be taken at any time.

use serde::{Deserialize, Serialize};

use crate::sim::Character;

/// One team's standing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTally {
    pub team: u32,
    /// Live characters
    pub alive: usize,
    /// Characters ever fielded
    pub fielded: usize,
    /// Sum of remaining health across live characters
    pub health: i32,
}

/// All teams' standings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTally {
    /// Sorted by team id
    pub teams: Vec<TeamTally>,
}

impl MatchTally {
    /// Summarise the roster
    pub fn from_characters(characters: &[Character]) -> Self {
        let mut teams: Vec<TeamTally> = Vec::new();
        for c in characters {
            let entry = match teams.iter().position(|t| t.team == c.team) {
                Some(i) => &mut teams[i],
                None => {
                    teams.push(TeamTally {
                        team: c.team,
                        alive: 0,
                        fielded: 0,
                        health: 0,
                    });
                    let last = teams.len() - 1;
                    &mut teams[last]
                }
            };
            entry.fielded += 1;
            if c.alive {
                entry.alive += 1;
                entry.health += c.health;
            }
        }
        teams.sort_by_key(|t| t.team);
        Self { teams }
    }

    /// The only team with survivors, if exactly one has any
    pub fn winner(&self) -> Option<u32> {
        let mut standing = self.teams.iter().filter(|t| t.alive > 0);
        match (standing.next(), standing.next()) {
            (Some(team), None) => Some(team.team),
            _ => None,
        }
    }

    /// Teams ranked by survivors, then remaining health, then team id
    pub fn standings(&self) -> Vec<&TeamTally> {
        let mut ranked: Vec<&TeamTally> = self.teams.iter().collect();
        ranked.sort_by(|a, b| {
            b.alive
                .cmp(&a.alive)
                .then(b.health.cmp(&a.health))
                .then(a.team.cmp(&b.team))
        });
        ranked
    }

    /// Total live characters across all teams
    pub fn alive(&self) -> usize {
        self.teams.iter().map(|t| t.alive).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Facing;

    fn roster(members: &[(u32, i32)]) -> Vec<Character> {
        members
            .iter()
            .enumerate()
            .map(|(i, &(team, health))| {
                let mut c =
                    Character::new(i as u32, team, format!("W{}", i), 100, 0.0, Facing::Right);
                c.apply_damage(100 - health);
                c
            })
            .collect()
    }

    #[test]
    fn test_tally_counts_dead_but_not_their_health() {
        let tally = MatchTally::from_characters(&roster(&[(0, 50), (1, 0), (0, 0), (1, 80)]));
        assert_eq!(tally.teams.len(), 2);
        assert_eq!(tally.teams[0], TeamTally { team: 0, alive: 1, fielded: 2, health: 50 });
        assert_eq!(tally.teams[1], TeamTally { team: 1, alive: 1, fielded: 2, health: 80 });
        assert_eq!(tally.alive(), 2);
        assert_eq!(tally.winner(), None);
    }

    #[test]
    fn test_winner_and_standings() {
        let tally = MatchTally::from_characters(&roster(&[(0, 20), (1, 0), (0, 100), (1, 0)]));
        assert_eq!(tally.winner(), Some(0));
        let order: Vec<u32> = tally.standings().iter().map(|t| t.team).collect();
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn test_standings_break_ties_on_health() {
        let tally = MatchTally::from_characters(&roster(&[(0, 20), (1, 60), (0, 30), (1, 10)]));
        let order: Vec<u32> = tally.standings().iter().map(|t| t.team).collect();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn test_everyone_dead_has_no_winner() {
        let tally = MatchTally::from_characters(&roster(&[(0, 0), (1, 0)]));
        assert_eq!(tally.winner(), None);
        assert_eq!(tally.alive(), 0);
    }
}
