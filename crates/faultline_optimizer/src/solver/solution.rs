use fxhash::FxHashMap;
use schemars::JsonSchema;
use serde::Serialize;

use crate::problem::{assignment_problem::AssignmentProblem, incident::IncidentIdx};

use super::branch_and_bound::SearchOutcome;

/// Terminal state of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum SolveStatus {
    /// A feasible assignment exists and the reported objective is proven
    /// minimal among all feasible assignments.
    Optimal,
    /// No assignment satisfies both the coverage and capacity constraints.
    Infeasible,
    /// Cannot occur for binary decisions over finite costs; kept for parity
    /// with the standard solver status vocabulary.
    Unbounded,
    /// No search has produced a verdict.
    NotSolved,
    /// The wall-clock budget expired before the search closed. Any reported
    /// assignment is feasible but not proven minimal.
    TimedOut,
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::NotSolved => "Not solved",
            SolveStatus::TimedOut => "Timed out",
        };
        write!(f, "{text}")
    }
}

/// One incident, the team serving it, and the travel distance between them.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AssignmentRecord {
    pub incident_id: String,
    pub team_id: String,
    pub distance_km: f64,
}

/// Aggregate load of one team over the whole assignment.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct TeamWorkload {
    pub team_id: String,
    pub incident_count: usize,
    pub capacity: usize,
    pub total_distance_km: f64,
}

/// Immutable result of one solve invocation. The objective and the
/// assignment are present for `Optimal` results, and for `TimedOut` results
/// that carry a best-found feasible incumbent.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Solution {
    status: SolveStatus,
    objective: Option<f64>,
    assignments: Vec<AssignmentRecord>,
    workloads: Vec<TeamWorkload>,
}

impl Solution {
    /// Nothing to assign: optimal by definition, with objective zero.
    pub(crate) fn trivial() -> Self {
        Solution {
            status: SolveStatus::Optimal,
            objective: Some(0.0),
            assignments: Vec::new(),
            workloads: Vec::new(),
        }
    }

    pub(crate) fn infeasible() -> Self {
        Solution {
            status: SolveStatus::Infeasible,
            objective: None,
            assignments: Vec::new(),
            workloads: Vec::new(),
        }
    }

    pub(crate) fn from_search(problem: &AssignmentProblem, outcome: SearchOutcome) -> Self {
        let Some(assignment) = outcome.assignment else {
            if outcome.proven {
                return Solution::infeasible();
            }
            return Solution {
                status: SolveStatus::TimedOut,
                objective: None,
                assignments: Vec::new(),
                workloads: Vec::new(),
            };
        };

        let status = if outcome.proven {
            SolveStatus::Optimal
        } else {
            SolveStatus::TimedOut
        };

        let mut assignments = Vec::with_capacity(problem.num_incidents());
        let mut counts = vec![0usize; problem.num_teams()];
        let mut totals = vec![0.0f64; problem.num_teams()];

        for (index, &team) in assignment.iter().enumerate() {
            let incident = IncidentIdx::new(index);
            let distance_km = problem.costs().cost(team, incident);

            counts[team.get()] += 1;
            totals[team.get()] += distance_km;

            assignments.push(AssignmentRecord {
                incident_id: problem.incident(incident).id().to_owned(),
                team_id: problem.team(team).id().to_owned(),
                distance_km,
            });
        }

        assignments.sort_by(|a, b| {
            (a.team_id.as_str(), a.incident_id.as_str())
                .cmp(&(b.team_id.as_str(), b.incident_id.as_str()))
        });

        let mut workloads: Vec<TeamWorkload> = problem
            .teams()
            .iter()
            .enumerate()
            .filter(|(index, _)| counts[*index] > 0)
            .map(|(index, team)| TeamWorkload {
                team_id: team.id().to_owned(),
                incident_count: counts[index],
                capacity: team.capacity(),
                total_distance_km: totals[index],
            })
            .collect();
        workloads.sort_by(|a, b| a.team_id.cmp(&b.team_id));

        let objective = assignments.iter().map(|record| record.distance_km).sum();

        Solution {
            status,
            objective: Some(objective),
            assignments,
            workloads,
        }
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn objective(&self) -> Option<f64> {
        self.objective
    }

    /// One record per incident, sorted by (team id, incident id) for
    /// reproducible display.
    pub fn assignments(&self) -> &[AssignmentRecord] {
        &self.assignments
    }

    /// One entry per team that received at least one incident, sorted by
    /// team id.
    pub fn workloads(&self) -> &[TeamWorkload] {
        &self.workloads
    }

    /// The incident id to team id view of the assignment.
    pub fn assignment_map(&self) -> FxHashMap<&str, &str> {
        self.assignments
            .iter()
            .map(|record| (record.incident_id.as_str(), record.team_id.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::solver::Solver;
    use crate::test_utils::problem_from_costs;

    fn solved() -> Solution {
        let rows = vec![
            vec![4.0, 11.0, 3.0, 9.0, 2.0],
            vec![5.0, 2.0, 8.0, 3.0, 7.0],
            vec![1.0, 6.0, 6.0, 12.0, 5.0],
        ];
        Solver::new(problem_from_costs(rows, vec![2, 2, 1])).solve()
    }

    #[test]
    fn test_records_are_sorted_by_team_then_incident() {
        let solution = solved();

        let keys: Vec<(&str, &str)> = solution
            .assignments()
            .iter()
            .map(|record| (record.team_id.as_str(), record.incident_id.as_str()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();

        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_every_incident_appears_exactly_once() {
        let solution = solved();

        let mut incident_ids: Vec<&str> = solution
            .assignments()
            .iter()
            .map(|record| record.incident_id.as_str())
            .collect();
        incident_ids.sort();
        incident_ids.dedup();

        assert_eq!(incident_ids.len(), 5);
        assert_eq!(solution.assignment_map().len(), 5);
    }

    #[test]
    fn test_workloads_reconcile_with_the_objective() {
        let solution = solved();

        let counted: usize = solution
            .workloads()
            .iter()
            .map(|workload| workload.incident_count)
            .sum();
        assert_eq!(counted, 5);

        let total: f64 = solution
            .workloads()
            .iter()
            .map(|workload| workload.total_distance_km)
            .sum();
        assert!((total - solution.objective().unwrap()).abs() < 5.0 * 0.01);

        for workload in solution.workloads() {
            assert!(workload.incident_count <= workload.capacity);
            assert!(workload.incident_count > 0);
        }
    }

    #[test]
    fn test_solution_serializes_for_the_presentation_layer() {
        let solution = solved();

        let json = serde_json::to_value(&solution).unwrap();
        assert_eq!(json["status"], "Optimal");
        assert!(json["objective"].as_f64().unwrap() > 0.0);
        assert_eq!(json["assignments"].as_array().unwrap().len(), 5);
    }
}
