use fxhash::FxHashSet;
use tracing::debug;

use crate::error::{ProblemError, ValidationError};

use super::{
    capacity::CapacityPolicy,
    cost_matrix::CostMatrix,
    incident::{Incident, IncidentIdx},
    location::check_location,
    team::{Team, TeamIdx},
};

/// A validated instance of the capacitated assignment problem: every
/// team-incident pair has a cost, every team has a concrete capacity.
pub struct AssignmentProblem {
    teams: Vec<Team>,
    incidents: Vec<Incident>,
    costs: CostMatrix,
    total_capacity: usize,
}

impl AssignmentProblem {
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, team: TeamIdx) -> &Team {
        &self.teams[team]
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn incident(&self, incident: IncidentIdx) -> &Incident {
        &self.incidents[incident]
    }

    pub fn costs(&self) -> &CostMatrix {
        &self.costs
    }

    pub fn num_teams(&self) -> usize {
        self.teams.len()
    }

    pub fn num_incidents(&self) -> usize {
        self.incidents.len()
    }

    pub fn total_capacity(&self) -> usize {
        self.total_capacity
    }
}

#[derive(Default)]
pub struct AssignmentProblemBuilder {
    teams: Vec<Team>,
    incidents: Vec<Incident>,
    capacity_policy: Option<CapacityPolicy>,
    costs: Option<CostMatrix>,
}

impl AssignmentProblemBuilder {
    pub fn set_teams(&mut self, teams: Vec<Team>) -> &mut AssignmentProblemBuilder {
        self.teams = teams;
        self
    }

    pub fn add_team(&mut self, team: Team) -> &mut AssignmentProblemBuilder {
        self.teams.push(team);
        self
    }

    pub fn set_incidents(&mut self, incidents: Vec<Incident>) -> &mut AssignmentProblemBuilder {
        self.incidents = incidents;
        self
    }

    pub fn add_incident(&mut self, incident: Incident) -> &mut AssignmentProblemBuilder {
        self.incidents.push(incident);
        self
    }

    /// Capacities are resolved at build time and overwrite whatever the
    /// teams carry. Without a policy the teams' own capacities are kept.
    pub fn set_capacity_policy(&mut self, policy: CapacityPolicy) -> &mut AssignmentProblemBuilder {
        self.capacity_policy = Some(policy);
        self
    }

    /// Without an explicit matrix, geodesic distances are computed at build
    /// time. An explicit matrix must match the team and incident counts.
    pub fn set_cost_matrix(&mut self, costs: CostMatrix) -> &mut AssignmentProblemBuilder {
        self.costs = Some(costs);
        self
    }

    pub fn build(self) -> Result<AssignmentProblem, ProblemError> {
        let mut teams = self.teams;
        let incidents = self.incidents;

        {
            let mut seen = FxHashSet::default();
            for team in &teams {
                if !seen.insert(team.id()) {
                    return Err(ValidationError::DuplicateTeam(team.id().to_owned()).into());
                }
            }

            let mut seen = FxHashSet::default();
            for incident in &incidents {
                if !seen.insert(incident.id()) {
                    return Err(ValidationError::DuplicateIncident(incident.id().to_owned()).into());
                }
            }
        }

        for team in &teams {
            check_location(team.id(), team.location())?;
        }
        for incident in &incidents {
            check_location(incident.id(), incident.location())?;
        }

        let costs = match self.costs {
            Some(costs) => {
                if costs.num_teams() != teams.len() || costs.num_incidents() != incidents.len() {
                    return Err(ValidationError::CostMatrixShape {
                        matrix_teams: costs.num_teams(),
                        matrix_incidents: costs.num_incidents(),
                        teams: teams.len(),
                        incidents: incidents.len(),
                    }
                    .into());
                }
                costs
            }
            None => CostMatrix::from_geodesic(&teams, &incidents)?,
        };

        if let Some(policy) = &self.capacity_policy {
            let resolved = policy.resolve(&teams, incidents.len())?;
            for (team, capacity) in teams.iter_mut().zip(resolved.iter()) {
                team.set_capacity(capacity);
            }
        }

        let total_capacity = teams.iter().map(Team::capacity).sum();

        debug!(
            teams = teams.len(),
            incidents = incidents.len(),
            total_capacity,
            "assembled assignment problem"
        );

        Ok(AssignmentProblem {
            teams,
            incidents,
            costs,
            total_capacity,
        })
    }
}
