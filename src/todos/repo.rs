use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

const TODO_COLUMNS: &str =
    "id, user_id, title, description, priority, status, completed, created_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "priority", rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "todo_status", rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Underprocess,
    Completed,
}

/// A task. `completed` is kept consistent with `status` whenever a status is
/// supplied; every row has exactly one owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub completed: bool,
    pub created_at: OffsetDateTime,
}

/// Aggregate counts over one owner's tasks.
#[derive(Debug, Serialize)]
pub struct TodoStats {
    pub total: i64,
    pub pending: i64,
    pub underprocess: i64,
    pub completed: i64,
    pub percentage: i64,
}

/// Rounded completion ratio; zero when there is nothing to count.
pub fn completion_percentage(completed: i64, total: i64) -> i64 {
    if total > 0 {
        ((completed as f64 / total as f64) * 100.0).round() as i64
    } else {
        0
    }
}

impl Todo {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        description: &str,
        priority: Priority,
        status: Status,
    ) -> anyhow::Result<Todo> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (user_id, title, description, priority, status, completed)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {TODO_COLUMNS}"
        ))
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(priority)
        .bind(status)
        .bind(status == Status::Completed)
        .fetch_one(db)
        .await?;
        Ok(todo)
    }

    /// Owner-scoped listing, newest first. Status and priority filter on
    /// exact value; search matches the title as a case-insensitive
    /// substring. Unknown filter values simply match nothing.
    pub async fn list(
        db: &PgPool,
        user_id: Uuid,
        status: Option<&str>,
        priority: Option<&str>,
        search: Option<&str>,
    ) -> anyhow::Result<Vec<Todo>> {
        let rows = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS}
             FROM todos
             WHERE user_id = $1
               AND ($2::text IS NULL OR status::text = $2)
               AND ($3::text IS NULL OR priority::text = $3)
               AND ($4::text IS NULL OR title ILIKE '%' || $4 || '%')
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .bind(status)
        .bind(priority)
        .bind(search)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Todo>> {
        let todo =
            sqlx::query_as::<_, Todo>(&format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = $1"))
                .bind(id)
                .fetch_optional(db)
                .await?;
        Ok(todo)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        priority: Option<Priority>,
        status: Option<Status>,
        completed: Option<bool>,
    ) -> anyhow::Result<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos SET
                 title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 priority = COALESCE($4, priority),
                 status = COALESCE($5, status),
                 completed = COALESCE($6, completed)
             WHERE id = $1
             RETURNING {TODO_COLUMNS}"
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(priority)
        .bind(status)
        .bind(completed)
        .fetch_optional(db)
        .await?;
        Ok(todo)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn stats(db: &PgPool, user_id: Uuid) -> anyhow::Result<TodoStats> {
        let (total, pending, underprocess, completed) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                "SELECT
                     COUNT(*),
                     COUNT(*) FILTER (WHERE status = 'pending'),
                     COUNT(*) FILTER (WHERE status = 'underprocess'),
                     COUNT(*) FILTER (WHERE status = 'completed')
                 FROM todos
                 WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_one(db)
            .await?;

        Ok(TodoStats {
            total,
            pending,
            underprocess,
            completed,
            percentage: completion_percentage(completed, total),
        })
    }
}
