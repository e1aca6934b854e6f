// ABOUTME: Tests for task storage
// ABOUTME: Row roundtrips, scoped listings, and attachment decoding

#[cfg(test)]
mod tests {
    use crate::storage::TaskStorage;
    use crate::types::{Task, TaskFilter, TaskPriority, TaskStatus};
    use cadence_core::EntityId;
    use cadence_projects::{ProjectCreateInput, ProjectStorage};
    use cadence_sprints::{SprintCreateInput, SprintStorage};
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;
    use sqlx::SqlitePool;

    async fn setup_test_db() -> SqlitePool {
        cadence_storage::connect_in_memory().await.unwrap()
    }

    async fn create_project(pool: &SqlitePool, name: &str) -> EntityId {
        ProjectStorage::new(pool.clone())
            .create_project(ProjectCreateInput {
                name: name.to_string(),
                description: None,
                team_id: None,
                lead_id: None,
                status: None,
                progress: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn create_sprint(pool: &SqlitePool, project_id: &EntityId) -> EntityId {
        let start = Utc::now();
        SprintStorage::new(pool.clone())
            .create_sprint(SprintCreateInput {
                name: "Sprint 1".to_string(),
                project_id: project_id.clone(),
                status: None,
                start_date: start,
                end_date: start + Duration::days(14),
            })
            .await
            .unwrap()
            .id
    }

    fn task(project_id: &EntityId) -> Task {
        let now = Utc::now();
        Task {
            id: EntityId::generate(),
            title: "Ship the importer".to_string(),
            description: Some("CSV first".to_string()),
            project_id: project_id.clone(),
            sprint_id: None,
            assignee_id: None,
            status: TaskStatus::ToDo,
            priority: TaskPriority::Medium,
            due_date: None,
            story_points: 3,
            estimated_hours: Some(6.5),
            time_spent_hours: None,
            requirement_attachments: vec!["brief.md".to_string()],
            completion_attachments: Vec::new(),
            review_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn inserted_rows_read_back_unchanged() {
        let pool = setup_test_db().await;
        let project = create_project(&pool, "Importer").await;
        let storage = TaskStorage::new(pool.clone());

        let task = task(&project);
        storage.insert(&pool, &task).await.unwrap();

        let stored = storage.get_task(&task.id).await.unwrap().unwrap();
        assert_eq!(stored.title, task.title);
        assert_eq!(stored.status, task.status);
        assert_eq!(stored.story_points, 3);
        assert_eq!(stored.estimated_hours, Some(6.5));
        assert_eq!(stored.requirement_attachments, vec!["brief.md".to_string()]);
        assert_eq!(stored.created_at, task.created_at);
    }

    #[tokio::test]
    async fn save_writes_back_every_mutable_column() {
        let pool = setup_test_db().await;
        let project = create_project(&pool, "Importer").await;
        let sprint = create_sprint(&pool, &project).await;
        let storage = TaskStorage::new(pool.clone());

        let mut task = task(&project);
        storage.insert(&pool, &task).await.unwrap();

        task.title = "Ship the importer, with retries".to_string();
        task.sprint_id = Some(sprint.clone());
        task.status = TaskStatus::Review;
        task.priority = TaskPriority::High;
        task.time_spent_hours = Some(4.0);
        task.completion_attachments.push("export.csv".to_string());
        task.review_notes = Some("looks close".to_string());
        task.updated_at = Utc::now();
        storage.save(&pool, &task).await.unwrap();

        let stored = storage.get_task(&task.id).await.unwrap().unwrap();
        assert_eq!(stored.title, task.title);
        assert_eq!(stored.sprint_id, Some(sprint));
        assert_eq!(stored.status, TaskStatus::Review);
        assert_eq!(stored.priority, TaskPriority::High);
        assert_eq!(stored.time_spent_hours, Some(4.0));
        assert_eq!(stored.completion_attachments, vec!["export.csv".to_string()]);
        assert_eq!(stored.review_notes.as_deref(), Some("looks close"));
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_existed() {
        let pool = setup_test_db().await;
        let project = create_project(&pool, "Importer").await;
        let storage = TaskStorage::new(pool.clone());

        let task = task(&project);
        storage.insert(&pool, &task).await.unwrap();

        assert!(storage.delete(&pool, &task.id).await.unwrap());
        assert!(!storage.delete(&pool, &task.id).await.unwrap());
        assert!(storage.get_task(&task.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn project_scoped_listing_restricts_and_filters() {
        let pool = setup_test_db().await;
        let inside = create_project(&pool, "Inside").await;
        let outside = create_project(&pool, "Outside").await;
        let storage = TaskStorage::new(pool.clone());

        let mut a = task(&inside);
        a.title = "A".to_string();
        storage.insert(&pool, &a).await.unwrap();

        let mut b = task(&inside);
        b.title = "B".to_string();
        b.status = TaskStatus::Done;
        storage.insert(&pool, &b).await.unwrap();

        let mut elsewhere = task(&outside);
        elsewhere.title = "C".to_string();
        storage.insert(&pool, &elsewhere).await.unwrap();

        let scope = vec![inside.clone()];
        let all = storage
            .list_in_projects(&scope, &TaskFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let done = storage
            .list_in_projects(
                &scope,
                &TaskFilter {
                    status: Some(TaskStatus::Done),
                    ..TaskFilter::default()
                },
            )
            .await
            .unwrap();
        let titles: Vec<_> = done.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["B".to_string()]);

        let nowhere = storage
            .list_in_projects(&[], &TaskFilter::default())
            .await
            .unwrap();
        assert!(nowhere.is_empty());
    }

    #[tokio::test]
    async fn sprint_board_lists_only_the_sprints_tasks() {
        let pool = setup_test_db().await;
        let project = create_project(&pool, "Importer").await;
        let sprint = create_sprint(&pool, &project).await;
        let storage = TaskStorage::new(pool.clone());

        let mut on_board = task(&project);
        on_board.sprint_id = Some(sprint.clone());
        storage.insert(&pool, &on_board).await.unwrap();

        let backlog = task(&project);
        storage.insert(&pool, &backlog).await.unwrap();

        let board = storage.list_for_sprint(&sprint).await.unwrap();
        let ids: Vec<_> = board.into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![on_board.id]);
    }

    #[tokio::test]
    async fn missing_attachment_columns_decode_as_empty() {
        let pool = setup_test_db().await;
        let project = create_project(&pool, "Importer").await;

        // A row written without attachment JSON, as an older build would have
        let id = EntityId::generate();
        sqlx::query("INSERT INTO tasks (id, title, project_id) VALUES (?, ?, ?)")
            .bind(&id)
            .bind("Bare row")
            .bind(&project)
            .execute(&pool)
            .await
            .unwrap();

        let stored = TaskStorage::new(pool).get_task(&id).await.unwrap().unwrap();
        assert!(stored.requirement_attachments.is_empty());
        assert!(stored.completion_attachments.is_empty());
        assert_eq!(stored.status, TaskStatus::ToDo);
        assert_eq!(stored.priority, TaskPriority::Medium);
        assert_eq!(stored.story_points, 1);
    }
}
