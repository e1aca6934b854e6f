// ABOUTME: Tests for sprint storage layer
// ABOUTME: Stats recomputation, scoped listing, and task detachment on delete

#[cfg(test)]
mod tests {
    use crate::storage::{recompute_sprint_stats, SprintStorage};
    use crate::types::{SprintCreateInput, SprintFilter, SprintStatus, SprintUpdateInput};
    use cadence_core::EntityId;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;
    use sqlx::SqlitePool;

    async fn setup_test_db() -> SqlitePool {
        cadence_storage::connect_in_memory().await.unwrap()
    }

    async fn insert_project(pool: &SqlitePool, name: &str) -> EntityId {
        let project_id = EntityId::generate();
        sqlx::query("INSERT INTO projects (id, name) VALUES (?, ?)")
            .bind(&project_id)
            .bind(name)
            .execute(pool)
            .await
            .unwrap();
        project_id
    }

    async fn insert_task(
        pool: &SqlitePool,
        project_id: &EntityId,
        sprint_id: Option<&EntityId>,
        status: &str,
        estimated_hours: Option<f64>,
        time_spent_hours: Option<f64>,
    ) -> EntityId {
        let task_id = EntityId::generate();
        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, project_id, sprint_id, status, estimated_hours, time_spent_hours)
            VALUES (?, 'task', ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task_id)
        .bind(project_id)
        .bind(sprint_id)
        .bind(status)
        .bind(estimated_hours)
        .bind(time_spent_hours)
        .execute(pool)
        .await
        .unwrap();
        task_id
    }

    fn input(name: &str, project_id: &EntityId) -> SprintCreateInput {
        let start = Utc::now();
        SprintCreateInput {
            name: name.to_string(),
            project_id: project_id.clone(),
            status: None,
            start_date: start,
            end_date: start + Duration::days(14),
        }
    }

    #[tokio::test]
    async fn create_sprint_starts_with_zeroed_stats() {
        let pool = setup_test_db().await;
        let project = insert_project(&pool, "Rollout").await;
        let storage = SprintStorage::new(pool);

        let sprint = storage.create_sprint(input("Sprint 1", &project)).await.unwrap();

        assert_eq!(sprint.status, SprintStatus::Upcoming);
        assert_eq!(sprint.stats.total_tasks, 0);
        assert_eq!(sprint.stats.tasks_completed, 0);
        assert_eq!(sprint.stats.estimated_hours, 0.0);
        assert_eq!(sprint.stats.time_spent_hours, 0.0);
    }

    #[tokio::test]
    async fn recompute_stats_summarizes_task_rows() {
        let pool = setup_test_db().await;
        let project = insert_project(&pool, "Rollout").await;
        let storage = SprintStorage::new(pool.clone());
        let sprint = storage.create_sprint(input("Sprint 1", &project)).await.unwrap();

        insert_task(&pool, &project, Some(&sprint.id), "done", Some(3.0), Some(4.5)).await;
        insert_task(&pool, &project, Some(&sprint.id), "done", Some(2.0), None).await;
        insert_task(&pool, &project, Some(&sprint.id), "in-progress", None, Some(1.0)).await;
        // Outside the sprint, must not count
        insert_task(&pool, &project, None, "done", Some(8.0), Some(8.0)).await;

        assert!(storage.recompute_stats(&sprint.id).await.unwrap());

        let reloaded = storage.get_sprint(&sprint.id).await.unwrap().unwrap();
        assert_eq!(reloaded.stats.total_tasks, 3);
        assert_eq!(reloaded.stats.tasks_completed, 2);
        assert_eq!(reloaded.stats.estimated_hours, 5.0);
        assert_eq!(reloaded.stats.time_spent_hours, 5.5);
    }

    #[tokio::test]
    async fn recompute_stats_runs_inside_a_caller_transaction() {
        let pool = setup_test_db().await;
        let project = insert_project(&pool, "Rollout").await;
        let storage = SprintStorage::new(pool.clone());
        let sprint = storage.create_sprint(input("Sprint 1", &project)).await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        let task_id = EntityId::generate();
        sqlx::query("INSERT INTO tasks (id, title, project_id, sprint_id, status) VALUES (?, 'task', ?, ?, 'done')")
            .bind(&task_id)
            .bind(&project)
            .bind(&sprint.id)
            .execute(&mut *tx)
            .await
            .unwrap();
        recompute_sprint_stats(&mut *tx, &sprint.id).await.unwrap();
        tx.commit().await.unwrap();

        let reloaded = storage.get_sprint(&sprint.id).await.unwrap().unwrap();
        assert_eq!(reloaded.stats.total_tasks, 1);
        assert_eq!(reloaded.stats.tasks_completed, 1);
    }

    #[tokio::test]
    async fn recompute_stats_of_unknown_sprint_reports_false() {
        let pool = setup_test_db().await;
        let storage = SprintStorage::new(pool);

        assert!(!storage.recompute_stats(&EntityId::generate()).await.unwrap());
    }

    #[tokio::test]
    async fn list_for_projects_restricts_to_scope() {
        let pool = setup_test_db().await;
        let in_scope = insert_project(&pool, "In scope").await;
        let out_of_scope = insert_project(&pool, "Out of scope").await;
        let storage = SprintStorage::new(pool);

        let visible = storage.create_sprint(input("Visible", &in_scope)).await.unwrap();
        storage.create_sprint(input("Hidden", &out_of_scope)).await.unwrap();

        let sprints = storage
            .list_for_projects(&[in_scope], &SprintFilter::default())
            .await
            .unwrap();
        let ids: Vec<_> = sprints.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![visible.id]);

        let none = storage
            .list_for_projects(&[], &SprintFilter::default())
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn list_for_projects_applies_filters() {
        let pool = setup_test_db().await;
        let project_a = insert_project(&pool, "A").await;
        let project_b = insert_project(&pool, "B").await;
        let storage = SprintStorage::new(pool);

        let active = storage
            .create_sprint(SprintCreateInput {
                status: Some(SprintStatus::Active),
                ..input("Active on A", &project_a)
            })
            .await
            .unwrap();
        storage.create_sprint(input("Upcoming on A", &project_a)).await.unwrap();
        storage
            .create_sprint(SprintCreateInput {
                status: Some(SprintStatus::Active),
                ..input("Active on B", &project_b)
            })
            .await
            .unwrap();

        let scope = vec![project_a.clone(), project_b];
        let filtered = storage
            .list_for_projects(
                &scope,
                &SprintFilter {
                    status: Some(SprintStatus::Active),
                    project_id: Some(project_a),
                },
            )
            .await
            .unwrap();
        let ids: Vec<_> = filtered.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![active.id]);
    }

    #[tokio::test]
    async fn update_sprint_changes_only_provided_fields() {
        let pool = setup_test_db().await;
        let project = insert_project(&pool, "Rollout").await;
        let storage = SprintStorage::new(pool);

        let sprint = storage.create_sprint(input("Sprint 1", &project)).await.unwrap();
        let new_end = sprint.end_date + Duration::days(7);

        let updated = storage
            .update_sprint(
                &sprint.id,
                SprintUpdateInput {
                    name: None,
                    status: Some(SprintStatus::Active),
                    start_date: None,
                    end_date: Some(new_end),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Sprint 1");
        assert_eq!(updated.status, SprintStatus::Active);
        assert_eq!(updated.end_date, new_end);
    }

    #[tokio::test]
    async fn delete_sprint_detaches_its_tasks() {
        let pool = setup_test_db().await;
        let project = insert_project(&pool, "Rollout").await;
        let storage = SprintStorage::new(pool.clone());
        let sprint = storage.create_sprint(input("Sprint 1", &project)).await.unwrap();
        let task = insert_task(&pool, &project, Some(&sprint.id), "to-do", None, None).await;

        assert!(storage.delete_sprint(&sprint.id).await.unwrap());

        let sprint_ref: (Option<String>,) =
            sqlx::query_as("SELECT sprint_id FROM tasks WHERE id = ?")
                .bind(&task)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(sprint_ref.0, None);
    }
}
