use crate::error::ValidationError;

use super::{
    incident::{Incident, IncidentIdx},
    location::check_location,
    team::{Team, TeamIdx},
};

pub type DistanceKm = f64;

/// Dense team x incident distance matrix in kilometers. Entries are stored
/// flat, row-major: `index = team * num_incidents + incident`.
#[derive(Debug)]
pub struct CostMatrix {
    entries: Vec<DistanceKm>,
    num_teams: usize,
    num_incidents: usize,
}

fn round_to_hundredth(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

impl CostMatrix {
    /// Geodesic distance between every team and incident, rounded to two
    /// decimal places. Identical coordinates always yield identical cost.
    pub fn from_geodesic(teams: &[Team], incidents: &[Incident]) -> Result<Self, ValidationError> {
        for team in teams {
            check_location(team.id(), team.location())?;
        }
        for incident in incidents {
            check_location(incident.id(), incident.location())?;
        }

        let num_teams = teams.len();
        let num_incidents = incidents.len();
        let mut entries = Vec::with_capacity(num_teams * num_incidents);

        for team in teams {
            for incident in incidents {
                let km = team.location().geodesic_distance_km(incident.location());
                entries.push(round_to_hundredth(km));
            }
        }

        Ok(CostMatrix {
            entries,
            num_teams,
            num_incidents,
        })
    }

    /// Caller-supplied costs, one row per team, one column per incident. A
    /// ragged row means a missing entry for a declared pair and is rejected,
    /// as are negative or non-finite entries.
    pub fn from_rows(rows: Vec<Vec<DistanceKm>>) -> Result<Self, ValidationError> {
        let num_teams = rows.len();
        let num_incidents = rows.first().map(Vec::len).unwrap_or(0);
        let mut entries = Vec::with_capacity(num_teams * num_incidents);

        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != num_incidents {
                return Err(ValidationError::RaggedCostRow {
                    row: row_index,
                    found: row.len(),
                    expected: num_incidents,
                });
            }

            for (column, &cost) in row.iter().enumerate() {
                if !cost.is_finite() || cost < 0.0 {
                    return Err(ValidationError::InvalidCost {
                        row: row_index,
                        column,
                    });
                }
                entries.push(cost);
            }
        }

        Ok(CostMatrix {
            entries,
            num_teams,
            num_incidents,
        })
    }

    #[inline(always)]
    fn index(&self, team: TeamIdx, incident: IncidentIdx) -> usize {
        team.get() * self.num_incidents + incident.get()
    }

    #[inline(always)]
    pub fn cost(&self, team: TeamIdx, incident: IncidentIdx) -> DistanceKm {
        self.entries[self.index(team, incident)]
    }

    pub fn num_teams(&self) -> usize {
        self.num_teams
    }

    pub fn num_incidents(&self) -> usize {
        self.num_incidents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{incident, team};

    #[test]
    fn test_geodesic_entries_are_rounded_to_two_decimals() {
        let teams = vec![
            team("Beyoglu", 41.042942843441594, 28.98187509471993),
            team("Bakirkoy", 40.98605787570794, 28.89211399154593),
        ];
        let incidents = vec![
            incident("Fault_1", 41.01255990927693, 28.962134641262114),
            incident("Fault_2", 41.046302182999646, 28.910872668799808),
        ];

        let matrix = CostMatrix::from_geodesic(&teams, &incidents).unwrap();

        for team_index in 0..2 {
            for incident_index in 0..2 {
                let km = matrix.cost(TeamIdx::new(team_index), IncidentIdx::new(incident_index));
                assert!(km > 0.0);
                assert!((km * 100.0 - (km * 100.0).round()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_geodesic_is_deterministic_and_symmetric() {
        let here = (41.042942843441594, 28.98187509471993);
        let there = (40.98605787570794, 28.89211399154593);

        let forward = CostMatrix::from_geodesic(
            &[team("A", here.0, here.1)],
            &[incident("B", there.0, there.1)],
        )
        .unwrap();
        let backward = CostMatrix::from_geodesic(
            &[team("B", there.0, there.1)],
            &[incident("A", here.0, here.1)],
        )
        .unwrap();

        let cell = (TeamIdx::new(0), IncidentIdx::new(0));
        assert_eq!(forward.cost(cell.0, cell.1), backward.cost(cell.0, cell.1));

        let again = CostMatrix::from_geodesic(
            &[team("A", here.0, here.1)],
            &[incident("B", there.0, there.1)],
        )
        .unwrap();
        assert_eq!(forward.cost(cell.0, cell.1), again.cost(cell.0, cell.1));
    }

    #[test]
    fn test_from_geodesic_rejects_bad_coordinates() {
        let teams = vec![team("A", 95.0, 29.0)];
        let incidents = vec![incident("B", 41.0, 29.0)];

        assert!(matches!(
            CostMatrix::from_geodesic(&teams, &incidents),
            Err(ValidationError::InvalidLatitude { .. })
        ));
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let result = CostMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);

        assert_eq!(
            result.unwrap_err(),
            ValidationError::RaggedCostRow {
                row: 1,
                found: 1,
                expected: 2,
            }
        );
    }

    #[test]
    fn test_from_rows_rejects_negative_and_non_finite_costs() {
        assert_eq!(
            CostMatrix::from_rows(vec![vec![1.0, -2.0]]).unwrap_err(),
            ValidationError::InvalidCost { row: 0, column: 1 }
        );
        assert_eq!(
            CostMatrix::from_rows(vec![vec![f64::NAN]]).unwrap_err(),
            ValidationError::InvalidCost { row: 0, column: 0 }
        );
    }

    #[test]
    fn test_flat_layout_maps_rows_to_teams() {
        let matrix = CostMatrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();

        assert_eq!(matrix.num_teams(), 2);
        assert_eq!(matrix.num_incidents(), 3);
        assert_eq!(matrix.cost(TeamIdx::new(0), IncidentIdx::new(2)), 3.0);
        assert_eq!(matrix.cost(TeamIdx::new(1), IncidentIdx::new(0)), 4.0);
    }
}
