use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context;
use clap::{Args, ValueEnum};
use comfy_table::Table;
use fxhash::FxHashMap;
use tracing::info;

use faultline_optimizer::{
    problem::{assignment_problem::AssignmentProblemBuilder, capacity::CapacityPolicy},
    solver::{
        solution::{Solution, SolveStatus},
        solver::{Solver, SolverParams},
    },
};

use crate::{parsers, registry};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CapacityMode {
    /// One capacity for every team (requires --capacity)
    Uniform,
    /// Capacities from --capacity-file; teams without an entry get 0
    PerTeam,
    /// ceil(faults / teams) + 1 for every team
    Auto,
}

#[derive(Args)]
pub struct SolveArgs {
    /// GeoJSON export with candidate fault sites
    #[arg(short, long)]
    geojson: PathBuf,

    /// JSON map of team id to [lat, lon]
    #[arg(short, long, default_value = "data/teams.json")]
    teams: PathBuf,

    /// Restrict the run to these fault ids (default: every site in the export)
    #[arg(short, long, value_delimiter = ',')]
    faults: Vec<String>,

    #[arg(long, value_enum, default_value_t = CapacityMode::Auto)]
    capacity_mode: CapacityMode,

    /// Capacity for every team in uniform mode
    #[arg(long)]
    capacity: Option<usize>,

    /// JSON map of team id to capacity in per-team mode
    #[arg(long)]
    capacity_file: Option<PathBuf>,

    /// Wall-clock limit for the search (e.g. "30s", "5m")
    #[arg(long, value_parser = parsers::parse_duration)]
    time_limit: Option<jiff::SignedDuration>,
}

fn capacity_policy(args: &SolveArgs) -> anyhow::Result<CapacityPolicy> {
    match args.capacity_mode {
        CapacityMode::Uniform => {
            let capacity = args
                .capacity
                .context("--capacity is required in uniform mode")?;
            Ok(CapacityPolicy::Uniform(capacity))
        }
        CapacityMode::PerTeam => {
            let path = args
                .capacity_file
                .as_ref()
                .context("--capacity-file is required in per-team mode")?;
            let file = File::open(path)
                .with_context(|| format!("opening capacity file {}", path.display()))?;
            let entries: FxHashMap<String, usize> = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing capacity file {}", path.display()))?;
            Ok(CapacityPolicy::PerTeam(entries))
        }
        CapacityMode::Auto => Ok(CapacityPolicy::AutoBalance),
    }
}

pub fn run(args: SolveArgs) -> anyhow::Result<()> {
    let teams = registry::load_teams(&args.teams)?;
    let sites = faultline_geojson::load_substations(&args.geojson)?;
    info!(teams = teams.len(), sites = sites.len(), "inputs loaded");

    let incidents = registry::select_incidents(sites, &args.faults)?;
    let policy = capacity_policy(&args)?;

    let mut builder = AssignmentProblemBuilder::default();
    builder.set_teams(teams);
    builder.set_incidents(incidents);
    builder.set_capacity_policy(policy);
    let problem = builder.build()?;

    let solver = Solver::with_params(
        problem,
        SolverParams {
            deadline: args.time_limit,
        },
    );
    let solution = solver.solve();

    render(&solution);

    Ok(())
}

fn render(solution: &Solution) {
    println!("Status: {}", solution.status());

    if solution.status() == SolveStatus::Infeasible {
        println!("No feasible assignment. Try raising team capacities.");
        return;
    }

    let Some(objective) = solution.objective() else {
        return;
    };
    println!("Total distance: {objective:.2} km");

    let mut assignments = Table::new();
    assignments.set_header(vec!["Fault", "Team", "Distance (km)"]);
    for record in solution.assignments() {
        assignments.add_row(vec![
            record.incident_id.clone(),
            record.team_id.clone(),
            format!("{:.2}", record.distance_km),
        ]);
    }
    println!("{assignments}");

    let mut workloads = Table::new();
    workloads.set_header(vec!["Team", "Faults", "Capacity", "Total (km)"]);
    for workload in solution.workloads() {
        workloads.add_row(vec![
            workload.team_id.clone(),
            workload.incident_count.to_string(),
            workload.capacity.to_string(),
            format!("{:.2}", workload.total_distance_km),
        ]);
    }
    println!("{workloads}");
}
