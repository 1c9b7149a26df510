use thiserror::Error;

/// Invalid capacity-policy parameters. Raised while resolving a policy,
/// before any solve attempt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("auto-balance capacity requires at least one team")]
    NoTeams,

    #[error("uniform capacity must be positive")]
    ZeroUniformCapacity,

    #[error("capacity entry references unknown team {0:?}")]
    UnknownTeam(String),
}

/// Malformed problem data. Raised while assembling a problem, before any
/// solve attempt.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("latitude {latitude} of {id:?} is outside [-90, 90]")]
    InvalidLatitude { id: String, latitude: f64 },

    #[error("longitude {longitude} of {id:?} is outside [-180, 180]")]
    InvalidLongitude { id: String, longitude: f64 },

    #[error("duplicate team id {0:?}")]
    DuplicateTeam(String),

    #[error("duplicate incident id {0:?}")]
    DuplicateIncident(String),

    #[error("cost matrix row {row} has {found} entries, expected {expected}")]
    RaggedCostRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("cost at row {row}, column {column} is not a finite non-negative number")]
    InvalidCost { row: usize, column: usize },

    #[error(
        "cost matrix shape {matrix_teams}x{matrix_incidents} does not match \
         {teams} teams and {incidents} incidents"
    )]
    CostMatrixShape {
        matrix_teams: usize,
        matrix_incidents: usize,
        teams: usize,
        incidents: usize,
    },
}

/// Umbrella error for problem assembly. Infeasibility is not an error: a
/// problem with too little capacity builds fine and solves to
/// [`SolveStatus::Infeasible`](crate::solver::solution::SolveStatus).
#[derive(Debug, Error)]
pub enum ProblemError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
