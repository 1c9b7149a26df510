use crate::define_index_newtype;

use super::location::Location;

define_index_newtype!(TeamIdx, Team);

/// A response crew with a depot location and a per-run handling capacity.
#[derive(Debug, Clone)]
pub struct Team {
    id: String,
    location: Location,
    capacity: usize,
}

impl Team {
    pub fn new(id: impl Into<String>, location: Location) -> Self {
        Team {
            id: id.into(),
            location,
            capacity: 0,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Maximum number of incidents this team may be assigned.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }
}
