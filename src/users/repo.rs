use anyhow::Context;
use sqlx::PgPool;

use super::repo_types::{NewUserRow, User, UserUpdateRow};

const USER_COLUMNS: &str = "id, name, last_name, email, password_hash, agency, is_superuser";

impl User {
    /// Find a user by exact (case-sensitive) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    pub async fn exists(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("check user exists")?;
        Ok(found.is_some())
    }

    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(db)
        .await
        .context("list users")?;
        Ok(users)
    }

    pub async fn create(db: &PgPool, row: &NewUserRow) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, last_name, email, password_hash, agency, is_superuser)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&row.name)
        .bind(&row.last_name)
        .bind(&row.email)
        .bind(&row.password_hash)
        .bind(&row.agency)
        .bind(row.is_superuser)
        .fetch_one(db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    /// Returns `None` when no row has this id.
    pub async fn update(
        db: &PgPool,
        id: i64,
        row: &UserUpdateRow,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET name = $2,
                   last_name = $3,
                   email = $4,
                   password_hash = COALESCE($5, password_hash),
                   agency = $6,
                   is_superuser = COALESCE($7, is_superuser)
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&row.name)
        .bind(&row.last_name)
        .bind(&row.email)
        .bind(row.password_hash.as_deref())
        .bind(&row.agency)
        .bind(row.is_superuser)
        .fetch_optional(db)
        .await
        .context("update user")?;
        Ok(user)
    }

    /// Returns whether a row was deleted.
    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("delete user")?;
        Ok(res.rows_affected() > 0)
    }
}
