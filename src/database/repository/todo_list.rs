use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::TodoListRepository;
use crate::database::manager::{abort, DatabaseError};
use crate::database::models::{NewTodoList, TodoList, UpdateListInput};
use crate::database::patch::Patch;

const INSERT_LIST: &str =
    "INSERT INTO todo_lists (title, description) VALUES ($1, $2) RETURNING id";

const INSERT_OWNERSHIP: &str = "INSERT INTO users_lists (user_id, list_id) VALUES ($1, $2)";

const SELECT_ALL: &str = "SELECT tl.id, tl.title, tl.description FROM todo_lists tl \
     INNER JOIN users_lists ul ON tl.id = ul.list_id \
     WHERE ul.user_id = $1 \
     ORDER BY tl.id";

const SELECT_ONE: &str = "SELECT tl.id, tl.title, tl.description FROM todo_lists tl \
     INNER JOIN users_lists ul ON tl.id = ul.list_id \
     WHERE ul.user_id = $1 AND ul.list_id = $2 \
     LIMIT 1";

const DELETE_ONE: &str = "DELETE FROM todo_lists tl USING users_lists ul \
     WHERE tl.id = ul.list_id AND ul.user_id = $1 AND ul.list_id = $2";

/// `UPDATE` restricted to lists joined to the user; binds are the patch values,
/// then list id, then user id.
pub(crate) fn update_sql(patch: &Patch) -> String {
    let next = patch.len() + 1;
    format!(
        "UPDATE todo_lists tl SET {} FROM users_lists ul \
         WHERE tl.id = ul.list_id AND ul.list_id = ${} AND ul.user_id = ${}",
        patch.set_clause(1),
        next,
        next + 1
    )
}

pub struct TodoListPostgres {
    pool: PgPool,
}

impl TodoListPostgres {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoListRepository for TodoListPostgres {
    async fn create(&self, user_id: i32, list: &NewTodoList) -> Result<i32, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let list_id = match sqlx::query_scalar::<_, i32>(INSERT_LIST)
            .bind(&list.title)
            .bind(&list.description)
            .fetch_one(&mut *tx)
            .await
        {
            Ok(id) => id,
            Err(e) => return abort(tx, e).await,
        };

        if let Err(e) = sqlx::query(INSERT_OWNERSHIP)
            .bind(user_id)
            .bind(list_id)
            .execute(&mut *tx)
            .await
        {
            return abort(tx, e).await;
        }

        tx.commit().await.map_err(DatabaseError::Transaction)?;
        Ok(list_id)
    }

    async fn get_all(&self, user_id: i32) -> Result<Vec<TodoList>, DatabaseError> {
        let lists = sqlx::query_as::<_, TodoList>(SELECT_ALL)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(lists)
    }

    async fn get_by_id(&self, user_id: i32, list_id: i32) -> Result<TodoList, DatabaseError> {
        sqlx::query_as::<_, TodoList>(SELECT_ONE)
            .bind(user_id)
            .bind(list_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("list {} not found", list_id)))
    }

    async fn delete(&self, user_id: i32, list_id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query(DELETE_ONE)
            .bind(user_id)
            .bind(list_id)
            .execute(&self.pool)
            .await?;

        debug!("delete list {}: {} row(s)", list_id, result.rows_affected());
        Ok(())
    }

    async fn update(
        &self,
        user_id: i32,
        list_id: i32,
        input: &UpdateListInput,
    ) -> Result<(), DatabaseError> {
        let patch = input.to_patch();
        if patch.is_empty() {
            return Err(DatabaseError::EmptyUpdate);
        }

        let query = update_sql(&patch);
        debug!("update query: {} columns={:?}", query, patch.columns());

        let result = patch
            .bind(sqlx::query(&query))
            .bind(list_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("list {} not found", list_id)));
        }
        Ok(())
    }
}
