use fxhash::FxHashMap;

use crate::error::ConfigurationError;

use super::team::{Team, TeamIdx};

/// How per-team capacities are determined for a run.
#[derive(Debug, Clone)]
pub enum CapacityPolicy {
    /// Every team receives the same positive capacity.
    Uniform(usize),
    /// Explicit capacity per team id; teams without an entry receive 0 and
    /// are excluded from receiving incidents.
    PerTeam(FxHashMap<String, usize>),
    /// `ceil(num_incidents / num_teams) + 1` for every team, one unit of
    /// slack above perfectly even division.
    AutoBalance,
}

impl CapacityPolicy {
    pub fn resolve(
        &self,
        teams: &[Team],
        num_incidents: usize,
    ) -> Result<ResolvedCapacities, ConfigurationError> {
        let per_team = match self {
            CapacityPolicy::Uniform(capacity) => {
                if *capacity == 0 {
                    return Err(ConfigurationError::ZeroUniformCapacity);
                }
                vec![*capacity; teams.len()]
            }
            CapacityPolicy::PerTeam(entries) => {
                for id in entries.keys() {
                    if !teams.iter().any(|team| team.id() == id) {
                        return Err(ConfigurationError::UnknownTeam(id.clone()));
                    }
                }

                teams
                    .iter()
                    .map(|team| entries.get(team.id()).copied().unwrap_or(0))
                    .collect()
            }
            CapacityPolicy::AutoBalance => {
                if teams.is_empty() {
                    return Err(ConfigurationError::NoTeams);
                }
                let capacity = num_incidents.div_ceil(teams.len()) + 1;
                vec![capacity; teams.len()]
            }
        };

        let total = per_team.iter().sum();

        Ok(ResolvedCapacities { per_team, total })
    }
}

/// Concrete capacities, aligned with the team slice they were resolved
/// against. The total is exposed up front: a total below the incident count
/// guarantees an infeasible solve.
#[derive(Debug, Clone)]
pub struct ResolvedCapacities {
    per_team: Vec<usize>,
    total: usize,
}

impl ResolvedCapacities {
    pub fn get(&self, team: TeamIdx) -> usize {
        self.per_team[team.get()]
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.per_team.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.per_team.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_team.is_empty()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn covers(&self, num_incidents: usize) -> bool {
        self.total >= num_incidents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::team;

    fn ten_teams() -> Vec<Team> {
        (0..10)
            .map(|index| team(&format!("Team_{index}"), 41.0, 29.0))
            .collect()
    }

    #[test]
    fn test_uniform_applies_to_every_team() {
        let teams = ten_teams();
        let resolved = CapacityPolicy::Uniform(3).resolve(&teams, 5).unwrap();

        assert!(resolved.iter().all(|capacity| capacity == 3));
        assert_eq!(resolved.total(), 30);
        assert!(resolved.covers(5));
    }

    #[test]
    fn test_uniform_zero_is_a_configuration_error() {
        let teams = ten_teams();
        assert_eq!(
            CapacityPolicy::Uniform(0).resolve(&teams, 5).unwrap_err(),
            ConfigurationError::ZeroUniformCapacity
        );
    }

    #[test]
    fn test_per_team_missing_entries_default_to_zero() {
        let teams = vec![team("A", 41.0, 29.0), team("B", 41.1, 29.1)];
        let entries = FxHashMap::from_iter([("A".to_owned(), 4)]);

        let resolved = CapacityPolicy::PerTeam(entries).resolve(&teams, 3).unwrap();

        assert_eq!(resolved.get(TeamIdx::new(0)), 4);
        assert_eq!(resolved.get(TeamIdx::new(1)), 0);
        assert_eq!(resolved.total(), 4);
    }

    #[test]
    fn test_per_team_unknown_id_is_a_configuration_error() {
        let teams = vec![team("A", 41.0, 29.0)];
        let entries = FxHashMap::from_iter([("Nope".to_owned(), 4)]);

        assert_eq!(
            CapacityPolicy::PerTeam(entries).resolve(&teams, 3).unwrap_err(),
            ConfigurationError::UnknownTeam("Nope".to_owned())
        );
    }

    #[test]
    fn test_auto_balance_adds_one_unit_of_slack() {
        let teams = ten_teams();
        let resolved = CapacityPolicy::AutoBalance.resolve(&teams, 10).unwrap();

        // ceil(10 / 10) + 1
        assert!(resolved.iter().all(|capacity| capacity == 2));
        assert_eq!(resolved.total(), 20);
    }

    #[test]
    fn test_auto_balance_rounds_up_before_the_slack() {
        let teams = vec![team("A", 41.0, 29.0), team("B", 41.1, 29.1)];
        let resolved = CapacityPolicy::AutoBalance.resolve(&teams, 5).unwrap();

        // ceil(5 / 2) + 1
        assert!(resolved.iter().all(|capacity| capacity == 4));
    }

    #[test]
    fn test_auto_balance_without_teams_is_a_configuration_error() {
        assert_eq!(
            CapacityPolicy::AutoBalance.resolve(&[], 5).unwrap_err(),
            ConfigurationError::NoTeams
        );
    }

    #[test]
    fn test_total_shortfall_is_visible_before_solving() {
        let teams = vec![team("A", 41.0, 29.0)];
        let entries = FxHashMap::from_iter([("A".to_owned(), 2)]);

        let resolved = CapacityPolicy::PerTeam(entries).resolve(&teams, 3).unwrap();

        assert!(!resolved.covers(3));
    }
}
