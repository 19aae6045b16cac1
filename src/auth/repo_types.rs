use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,          // assigned by the store
    pub email: String,    // login key
    pub password: String, // Argon2 PHC string, never plaintext
    pub name: String,     // display name
}
