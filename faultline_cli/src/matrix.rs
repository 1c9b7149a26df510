use std::path::PathBuf;

use clap::Args;
use comfy_table::Table;

use faultline_optimizer::problem::{
    cost_matrix::CostMatrix,
    incident::IncidentIdx,
    team::TeamIdx,
};

use crate::registry;

#[derive(Args)]
pub struct MatrixArgs {
    /// GeoJSON export with candidate fault sites
    #[arg(short, long)]
    geojson: PathBuf,

    /// JSON map of team id to [lat, lon]
    #[arg(short, long, default_value = "data/teams.json")]
    teams: PathBuf,

    /// Restrict the table to these fault ids
    #[arg(short, long, value_delimiter = ',')]
    faults: Vec<String>,
}

pub fn run(args: MatrixArgs) -> anyhow::Result<()> {
    let teams = registry::load_teams(&args.teams)?;
    let sites = faultline_geojson::load_substations(&args.geojson)?;
    let incidents = registry::select_incidents(sites, &args.faults)?;

    let matrix = CostMatrix::from_geodesic(&teams, &incidents)?;

    let mut table = Table::new();
    let mut header = vec!["Team".to_owned()];
    header.extend(incidents.iter().map(|incident| incident.id().to_owned()));
    table.set_header(header);

    for (team_index, team) in teams.iter().enumerate() {
        let mut row = vec![team.id().to_owned()];
        for incident_index in 0..incidents.len() {
            let km = matrix.cost(TeamIdx::new(team_index), IncidentIdx::new(incident_index));
            row.push(format!("{km:.2}"));
        }
        table.add_row(row);
    }

    println!("{table}");

    Ok(())
}
