use crate::problem::{
    assignment_problem::{AssignmentProblem, AssignmentProblemBuilder},
    cost_matrix::CostMatrix,
    incident::Incident,
    location::Location,
    team::Team,
};

pub(crate) fn team(id: &str, lat: f64, lon: f64) -> Team {
    Team::new(id, Location::from_lat_lon(lat, lon))
}

pub(crate) fn incident(id: &str, lat: f64, lon: f64) -> Incident {
    Incident::new(id, Location::from_lat_lon(lat, lon))
}

/// Problem with synthetic ids, explicit costs and per-team capacities. Row
/// `i` of `rows` holds team `Team_i`'s cost to every incident.
pub(crate) fn problem_from_costs(rows: Vec<Vec<f64>>, capacities: Vec<usize>) -> AssignmentProblem {
    assert_eq!(rows.len(), capacities.len());
    let num_incidents = rows.first().map(Vec::len).unwrap_or(0);

    let teams: Vec<Team> = capacities
        .iter()
        .enumerate()
        .map(|(index, &capacity)| {
            team(&format!("Team_{index}"), 41.0, 29.0).with_capacity(capacity)
        })
        .collect();
    let incidents: Vec<Incident> = (0..num_incidents)
        .map(|index| incident(&format!("Fault_{index}"), 41.0, 29.0))
        .collect();

    let mut builder = AssignmentProblemBuilder::default();
    builder.set_teams(teams);
    builder.set_incidents(incidents);
    builder.set_cost_matrix(CostMatrix::from_rows(rows).unwrap());

    builder.build().unwrap()
}
