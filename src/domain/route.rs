//! Route domain types

use serde::{Deserialize, Serialize};

/// A route configuration reduced to its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,

    /// Destination cluster joined with the route's path match, e.g. `backend/api`
    pub destination_cluster: String,

    pub last_updated: String,
}
