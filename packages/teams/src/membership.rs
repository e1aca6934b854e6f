// ABOUTME: Membership manager: lead-gated add/remove of team members
// ABOUTME: Sanitizes candidate id lists and skips users already on a team

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;

use cadence_core::EntityId;
use cadence_storage::StorageError;
use cadence_users::{User, UserStorage};

use crate::storage::TeamStorage;
use crate::types::Team;

#[derive(Error, Debug)]
pub enum MembershipError {
    #[error("team not found: {0}")]
    TeamNotFound(EntityId),
    #[error("only the team lead can manage members")]
    NotTeamLead,
    #[error("no usable member ids in request")]
    NoValidCandidates,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct MembershipManager {
    teams: TeamStorage,
    users: UserStorage,
}

impl MembershipManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            teams: TeamStorage::new(pool.clone()),
            users: UserStorage::new(pool),
        }
    }

    /// Add users to a team. Only the team's lead may do this. Candidates that
    /// are unknown or already belong to a team are skipped, not errors.
    /// Returns the team's member list after the operation.
    pub async fn add_members(
        &self,
        team_id: &EntityId,
        acting_lead: &EntityId,
        candidates: &[String],
    ) -> Result<Vec<User>, MembershipError> {
        let team = self.require_led_team(team_id, acting_lead).await?;

        let candidate_ids = sanitize_candidates(candidates);
        if candidate_ids.is_empty() {
            return Err(MembershipError::NoValidCandidates);
        }

        for candidate in &candidate_ids {
            let added = self.users.attach_to_team(candidate, &team.id).await?;
            if !added {
                debug!(
                    "Skipping candidate {}: unknown or already on a team",
                    candidate
                );
            }
        }

        Ok(self.users.list_team_members(&team.id).await?)
    }

    /// Remove users from a team. Only the team's lead may do this. Ids that do
    /// not belong to this team are skipped. Task assignments are left alone.
    /// Returns the team's member list after the operation.
    pub async fn remove_members(
        &self,
        team_id: &EntityId,
        acting_lead: &EntityId,
        member_ids: &[String],
    ) -> Result<Vec<User>, MembershipError> {
        let team = self.require_led_team(team_id, acting_lead).await?;

        let candidate_ids = sanitize_candidates(member_ids);
        if candidate_ids.is_empty() {
            return Err(MembershipError::NoValidCandidates);
        }

        for member in &candidate_ids {
            let removed = self.users.detach_from_team(member, &team.id).await?;
            if !removed {
                debug!("Skipping {}: not a member of team {}", member, team.id);
            }
        }

        Ok(self.users.list_team_members(&team.id).await?)
    }

    pub async fn list_members(&self, team_id: &EntityId) -> Result<Vec<User>, MembershipError> {
        let team = self
            .teams
            .get_team(team_id)
            .await?
            .ok_or_else(|| MembershipError::TeamNotFound(team_id.clone()))?;

        Ok(self.users.list_team_members(&team.id).await?)
    }

    async fn require_led_team(
        &self,
        team_id: &EntityId,
        acting_lead: &EntityId,
    ) -> Result<Team, MembershipError> {
        let team = self
            .teams
            .get_team(team_id)
            .await?
            .ok_or_else(|| MembershipError::TeamNotFound(team_id.clone()))?;

        if team.lead_id.as_ref() != Some(acting_lead) {
            return Err(MembershipError::NotTeamLead);
        }

        Ok(team)
    }
}

/// Normalize a raw candidate list into entity ids: trims whitespace, drops
/// empty strings and the literal "undefined"/"null" placeholders clients are
/// known to send, drops anything that is not a well-formed id, and keeps the
/// first occurrence of each id.
fn sanitize_candidates(raw: &[String]) -> Vec<EntityId> {
    let mut ids: Vec<EntityId> = Vec::new();

    for value in raw {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "undefined" || trimmed == "null" {
            debug!("Dropping placeholder candidate id: {:?}", value);
            continue;
        }

        match EntityId::parse(trimmed) {
            Ok(id) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            Err(_) => debug!("Dropping malformed candidate id: {:?}", value),
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn sanitize_drops_placeholders_and_garbage() {
        let id = EntityId::generate();
        let input = raw(&[
            "",
            "  ",
            "undefined",
            "null",
            "not-hex-at-all",
            "abc123",
            id.as_str(),
        ]);

        assert_eq!(sanitize_candidates(&input), vec![id]);
    }

    #[test]
    fn sanitize_trims_and_deduplicates() {
        let id = EntityId::generate();
        let padded = format!("  {}  ", id);
        let input = raw(&[id.as_str(), &padded, id.as_str()]);

        assert_eq!(sanitize_candidates(&input), vec![id]);
    }

    #[test]
    fn sanitize_keeps_first_occurrence_order() {
        let first = EntityId::generate();
        let second = EntityId::generate();
        let input = raw(&[first.as_str(), second.as_str(), first.as_str()]);

        assert_eq!(sanitize_candidates(&input), vec![first, second]);
    }

    #[test]
    fn sanitize_of_all_invalid_input_is_empty() {
        let input = raw(&["", "undefined", "null", "xyz"]);
        assert!(sanitize_candidates(&input).is_empty());
    }
}
