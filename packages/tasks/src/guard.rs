// ABOUTME: Cross-reference guards run before task mutations are accepted
// ABOUTME: Relationship invariants between sprint, project, assignee, and lead

use cadence_core::EntityId;
use cadence_sprints::Sprint;
use cadence_users::User;

use crate::lifecycle::TaskError;

/// A task may only sit in a sprint of its own project.
pub fn ensure_sprint_in_project(sprint: &Sprint, project_id: &EntityId) -> Result<(), TaskError> {
    if sprint.project_id != *project_id {
        return Err(TaskError::SprintProjectMismatch {
            sprint: sprint.id.clone(),
            project: project_id.clone(),
        });
    }
    Ok(())
}

/// An assignee must be on the authorizing lead's team. Two users with no
/// team at all also match, mirroring how absent references compare equal.
pub fn ensure_assignee_on_lead_team(assignee: &User, lead: &User) -> Result<(), TaskError> {
    if assignee.team_id != lead.team_id {
        return Err(TaskError::AssigneeNotOnLeadTeam {
            assignee: assignee.id.clone(),
        });
    }
    Ok(())
}
