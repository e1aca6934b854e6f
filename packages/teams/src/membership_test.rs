// ABOUTME: Tests for the membership manager
// ABOUTME: Lead gating, candidate sanitization, and set semantics of membership

#[cfg(test)]
mod tests {
    use crate::membership::{MembershipError, MembershipManager};
    use crate::storage::TeamStorage;
    use crate::types::{Team, TeamCreateInput};
    use cadence_core::EntityId;
    use cadence_users::{User, UserCreateInput, UserRole, UserStorage};
    use pretty_assertions::assert_eq;
    use sqlx::SqlitePool;

    async fn setup_test_db() -> SqlitePool {
        cadence_storage::connect_in_memory().await.unwrap()
    }

    async fn create_user(pool: &SqlitePool, name: &str, role: UserRole) -> User {
        UserStorage::new(pool.clone())
            .create_user(UserCreateInput {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                role: Some(role),
                status: None,
                team_id: None,
            })
            .await
            .unwrap()
    }

    async fn create_team(pool: &SqlitePool, name: &str, lead_id: Option<EntityId>) -> Team {
        TeamStorage::new(pool.clone())
            .create_team(TeamCreateInput {
                name: name.to_string(),
                description: None,
                lead_id,
                parent_team_id: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn lead_adds_free_users_and_skips_the_rest() {
        let pool = setup_test_db().await;
        let lead = create_user(&pool, "Lead", UserRole::TeamLead).await;
        let team = create_team(&pool, "Platform", Some(lead.id.clone())).await;

        let other_team = create_team(&pool, "Mobile", None).await;
        let free = create_user(&pool, "Free", UserRole::Member).await;
        let taken = create_user(&pool, "Taken", UserRole::Member).await;
        UserStorage::new(pool.clone())
            .attach_to_team(&taken.id, &other_team.id)
            .await
            .unwrap();

        let manager = MembershipManager::new(pool.clone());
        let members = manager
            .add_members(
                &team.id,
                &lead.id,
                &[
                    free.id.to_string(),
                    taken.id.to_string(),
                    EntityId::generate().to_string(),
                    "undefined".to_string(),
                    free.id.to_string(),
                ],
            )
            .await
            .unwrap();

        let ids: Vec<_> = members.iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids, vec![free.id]);

        // The user already on another team was not poached
        let taken_now = UserStorage::new(pool).get_user(&taken.id).await.unwrap().unwrap();
        assert_eq!(taken_now.team_id, Some(other_team.id));
    }

    #[tokio::test]
    async fn add_members_requires_this_teams_lead() {
        let pool = setup_test_db().await;
        let lead = create_user(&pool, "Lead", UserRole::TeamLead).await;
        let other_lead = create_user(&pool, "Other Lead", UserRole::TeamLead).await;
        let team = create_team(&pool, "Platform", Some(lead.id.clone())).await;
        let member = create_user(&pool, "Member", UserRole::Member).await;

        let manager = MembershipManager::new(pool.clone());
        let err = manager
            .add_members(&team.id, &other_lead.id, &[member.id.to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::NotTeamLead));

        assert!(manager.list_members(&team.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_members_with_no_usable_candidates_is_rejected() {
        let pool = setup_test_db().await;
        let lead = create_user(&pool, "Lead", UserRole::TeamLead).await;
        let team = create_team(&pool, "Platform", Some(lead.id.clone())).await;

        let manager = MembershipManager::new(pool.clone());
        let err = manager
            .add_members(
                &team.id,
                &lead.id,
                &[
                    "".to_string(),
                    "undefined".to_string(),
                    "null".to_string(),
                    "not-an-id".to_string(),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::NoValidCandidates));

        assert!(manager.list_members(&team.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn membership_is_a_set() {
        let pool = setup_test_db().await;
        let lead = create_user(&pool, "Lead", UserRole::TeamLead).await;
        let team = create_team(&pool, "Platform", Some(lead.id.clone())).await;
        let member = create_user(&pool, "Member", UserRole::Member).await;

        let manager = MembershipManager::new(pool);

        let first = manager
            .add_members(&team.id, &lead.id, &[member.id.to_string()])
            .await
            .unwrap();
        assert_eq!(first.len(), 1);

        // Adding the same user again changes nothing
        let second = manager
            .add_members(&team.id, &lead.id, &[member.id.to_string()])
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn remove_detaches_only_members_of_this_team() {
        let pool = setup_test_db().await;
        let lead = create_user(&pool, "Lead", UserRole::TeamLead).await;
        let team = create_team(&pool, "Platform", Some(lead.id.clone())).await;
        let other_team = create_team(&pool, "Mobile", None).await;

        let ours = create_user(&pool, "Ours", UserRole::Member).await;
        let theirs = create_user(&pool, "Theirs", UserRole::Member).await;
        let users = UserStorage::new(pool.clone());
        users.attach_to_team(&ours.id, &team.id).await.unwrap();
        users.attach_to_team(&theirs.id, &other_team.id).await.unwrap();

        let manager = MembershipManager::new(pool.clone());
        let remaining = manager
            .remove_members(
                &team.id,
                &lead.id,
                &[ours.id.to_string(), theirs.id.to_string()],
            )
            .await
            .unwrap();
        assert!(remaining.is_empty());

        let theirs_now = users.get_user(&theirs.id).await.unwrap().unwrap();
        assert_eq!(theirs_now.team_id, Some(other_team.id));
    }

    #[tokio::test]
    async fn remove_leaves_task_assignments_in_place() {
        let pool = setup_test_db().await;
        let lead = create_user(&pool, "Lead", UserRole::TeamLead).await;
        let team = create_team(&pool, "Platform", Some(lead.id.clone())).await;
        let member = create_user(&pool, "Member", UserRole::Member).await;

        let users = UserStorage::new(pool.clone());
        users.attach_to_team(&member.id, &team.id).await.unwrap();

        let project_id = EntityId::generate();
        sqlx::query("INSERT INTO projects (id, name) VALUES (?, 'Rollout')")
            .bind(&project_id)
            .execute(&pool)
            .await
            .unwrap();
        let task_id = EntityId::generate();
        sqlx::query("INSERT INTO tasks (id, title, project_id, assignee_id) VALUES (?, 'Ship it', ?, ?)")
            .bind(&task_id)
            .bind(&project_id)
            .bind(&member.id)
            .execute(&pool)
            .await
            .unwrap();

        MembershipManager::new(pool.clone())
            .remove_members(&team.id, &lead.id, &[member.id.to_string()])
            .await
            .unwrap();

        let assignee: (Option<String>,) =
            sqlx::query_as("SELECT assignee_id FROM tasks WHERE id = ?")
                .bind(&task_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(assignee.0.as_deref(), Some(member.id.as_str()));
    }

    #[tokio::test]
    async fn unknown_team_is_reported_as_not_found() {
        let pool = setup_test_db().await;
        let lead = create_user(&pool, "Lead", UserRole::TeamLead).await;

        let manager = MembershipManager::new(pool);
        let err = manager
            .add_members(&EntityId::generate(), &lead.id, &[lead.id.to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::TeamNotFound(_)));
    }
}
