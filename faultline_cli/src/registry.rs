use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use anyhow::Context;
use faultline_geojson::Site;
use faultline_optimizer::problem::{incident::Incident, location::Location, team::Team};

/// Team registry: JSON map of team id to `[lat, lon]`. A BTreeMap keeps the
/// roster in id order so identical inputs produce identical runs.
pub fn load_teams(path: &Path) -> anyhow::Result<Vec<Team>> {
    let file =
        File::open(path).with_context(|| format!("opening team registry {}", path.display()))?;
    let registry: BTreeMap<String, [f64; 2]> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing team registry {}", path.display()))?;

    Ok(registry
        .into_iter()
        .map(|(id, [lat, lon])| Team::new(id, Location::from_lat_lon(lat, lon)))
        .collect())
}

/// The faulted sites for this run: every substation in the export, or the
/// `--faults` subset when given. Unknown ids are rejected rather than
/// silently dropped.
pub fn select_incidents(sites: Vec<Site>, faults: &[String]) -> anyhow::Result<Vec<Incident>> {
    let selected: Vec<Site> = if faults.is_empty() {
        sites
    } else {
        for id in faults {
            if !sites.iter().any(|site| &site.id == id) {
                anyhow::bail!("unknown fault id {id:?}");
            }
        }
        sites
            .into_iter()
            .filter(|site| faults.contains(&site.id))
            .collect()
    };

    Ok(selected
        .into_iter()
        .map(|site| Incident::new(site.id, Location::from_lat_lon(site.lat, site.lon)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sites() -> Vec<Site> {
        vec![
            Site {
                id: "Substation_1".to_owned(),
                lat: 41.01,
                lon: 28.96,
            },
            Site {
                id: "Substation_2".to_owned(),
                lat: 41.04,
                lon: 28.91,
            },
        ]
    }

    #[test]
    fn test_no_filter_keeps_every_site() {
        let incidents = select_incidents(sites(), &[]).unwrap();
        assert_eq!(incidents.len(), 2);
    }

    #[test]
    fn test_filter_keeps_the_selected_subset() {
        let incidents = select_incidents(sites(), &["Substation_2".to_owned()]).unwrap();

        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].id(), "Substation_2");
    }

    #[test]
    fn test_unknown_fault_ids_are_rejected() {
        assert!(select_incidents(sites(), &["Substation_9".to_owned()]).is_err());
    }
}
