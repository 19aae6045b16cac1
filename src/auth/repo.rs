use crate::auth::repo_types::User;
use sqlx::SqlitePool;

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, name
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(r#"SELECT id, email, password, name FROM users WHERE id = ?"#)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Insert a user with an already hashed password. Callers check the email
    /// with [`User::find_by_email`] first; nothing here rejects duplicates.
    pub async fn insert(
        db: &SqlitePool,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password, name)
            VALUES (?, ?, ?)
            RETURNING id, email, password, name
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .fetch_one(db)
        .await
    }
}
