//! Location Handlers
//!
//! Public lookups backing the cascading division, city and area selects at checkout.

pub(crate) mod areas;
pub(crate) mod cities;
pub(crate) mod divisions;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A selectable location.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LocationResponse {
    pub uuid: Uuid,
    pub name: String,
}

/// Locations one level below the requested parent, by name.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LocationsResponse {
    pub locations: Vec<LocationResponse>,
}

impl LocationsResponse {
    fn from_pairs(pairs: impl IntoIterator<Item = (Uuid, String)>) -> Self {
        Self {
            locations: pairs
                .into_iter()
                .map(|(uuid, name)| LocationResponse { uuid, name })
                .collect(),
        }
    }
}
