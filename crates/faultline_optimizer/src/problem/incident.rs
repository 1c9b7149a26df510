use crate::define_index_newtype;

use super::location::Location;

define_index_newtype!(IncidentIdx, Incident);

/// A fault site awaiting exactly one team.
#[derive(Debug, Clone)]
pub struct Incident {
    id: String,
    location: Location,
}

impl Incident {
    pub fn new(id: impl Into<String>, location: Location) -> Self {
        Incident {
            id: id.into(),
            location,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}
