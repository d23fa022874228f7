//! User repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::sqlite::schema::USER_COLUMNS;
use crate::data::types::{NewUser, UserRow};
use crate::domain::{LookupFilter, UsernameField};
use crate::utils::crypto;

/// Prefix marking a password that can never match (login only via impersonation)
pub const UNUSABLE_PASSWORD_PREFIX: &str = "!";

type UserTuple = (
    i64,
    Option<String>,
    Option<String>,
    String,
    String,
    String,
    bool,
    bool,
    bool,
    Option<i64>,
    i64,
);

fn row_to_user(row: UserTuple) -> UserRow {
    let (
        id,
        username,
        email,
        password,
        first_name,
        last_name,
        is_active,
        is_staff,
        is_superuser,
        last_login,
        date_joined,
    ) = row;
    UserRow {
        id,
        username,
        email,
        password,
        first_name,
        last_name,
        is_active,
        is_staff,
        is_superuser,
        last_login,
        date_joined,
    }
}

/// Create a new user with an unusable password
pub async fn create_user(pool: &SqlitePool, user: &NewUser) -> Result<UserRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let password = format!("{}{}", UNUSABLE_PASSWORD_PREFIX, crypto::generate_token(20));

    let result = sqlx::query(
        "INSERT INTO users (username, email, password, first_name, last_name, is_active, is_staff, is_superuser, date_joined) \
         VALUES (?, ?, ?, ?, ?, 1, ?, ?, ?)",
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&password)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(user.is_staff)
    .bind(user.is_superuser)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db) if db.is_unique_violation() => SqliteError::Conflict(format!(
            "username already exists: {}",
            user.username.as_deref().unwrap_or_default()
        )),
        _ => SqliteError::Database(e),
    })?;

    let id = result.last_insert_rowid();
    tracing::debug!(%id, "User created");

    Ok(UserRow {
        id,
        username: user.username.clone(),
        email: user.email.clone(),
        password,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_active: true,
        is_staff: user.is_staff,
        is_superuser: user.is_superuser,
        last_login: None,
        date_joined: now,
    })
}

/// Get a user by ID
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<Option<UserRow>, SqliteError> {
    let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
    let row = sqlx::query_as::<_, UserTuple>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(row_to_user))
}

/// Find users matching a lookup filter
///
/// Column names come from [`UsernameField::column`], never from input.
pub async fn find_users(
    pool: &SqlitePool,
    filter: &LookupFilter,
    username_field: UsernameField,
    limit: u32,
) -> Result<Vec<UserRow>, SqliteError> {
    let column = match filter {
        LookupFilter::Id(_) => "id",
        LookupFilter::Email(_) => "email",
        LookupFilter::Username(_) => username_field.column(),
    };
    let sql = format!(
        "SELECT {} FROM users WHERE {} = ? ORDER BY id LIMIT ?",
        USER_COLUMNS, column
    );

    let query = sqlx::query_as::<_, UserTuple>(&sql);
    let query = match filter {
        LookupFilter::Id(id) => query.bind(*id),
        LookupFilter::Email(value) | LookupFilter::Username(value) => query.bind(value.as_str()),
    };

    let rows = query.bind(limit as i64).fetch_all(pool).await?;
    Ok(rows.into_iter().map(row_to_user).collect())
}

/// List most recently active users
///
/// Users that never logged in sort after everyone who did; ties keep id order.
pub async fn list_recent(pool: &SqlitePool, limit: u32) -> Result<Vec<UserRow>, SqliteError> {
    let sql = format!(
        "SELECT {} FROM users ORDER BY last_login IS NULL, last_login DESC, id ASC LIMIT ?",
        USER_COLUMNS
    );
    let rows = sqlx::query_as::<_, UserTuple>(&sql)
        .bind(limit as i64)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(row_to_user).collect())
}

/// Stamp a user's last login time
pub async fn record_login(pool: &SqlitePool, id: i64) -> Result<(), SqliteError> {
    let now = chrono::Utc::now().timestamp();
    sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
