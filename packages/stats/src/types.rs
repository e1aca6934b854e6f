// ABOUTME: Statistics type definitions
// ABOUTME: The team dashboard summary returned by the stats engine

use serde::{Deserialize, Serialize};

/// One team's dashboard numbers. All zeroes doubles as the degraded output
/// when the team is unknown or aggregation fails partway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStatistics {
    pub total_members: i64,
    pub active_projects: i64,
    pub team_progress: i64,
    pub upcoming_sprints: i64,
    pub completed_tasks: i64,
    pub total_tasks: i64,
}
