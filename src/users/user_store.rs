//! User Storage
//! Mission: Persist user records in SQLite

use crate::users::models::{NewUser, User, UserChanges, UserStatus};
use anyhow::{Context, Result};
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

const USER_COLUMNS: &str =
    "id, nombre, apellido, estado, profesion, password_hash, created_at, updated_at";

/// User storage with SQLite backend
pub struct UserStore {
    conn: Mutex<Connection>,
}

impl UserStore {
    /// Open (or create) the database file and initialize the schema
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open user database at {}", db_path))?;
        Self::from_connection(conn)
    }

    /// Private in-memory database, mostly for tests
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// List all users
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;

        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Get user by id
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn.lock();
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                user_from_row,
            )
            .optional()?;

        Ok(user)
    }

    /// Insert a user; the password must already be hashed
    pub fn create_user(&self, new_user: NewUser) -> Result<User> {
        let now = Utc::now();
        let conn = self.conn.lock();

        let user = conn
            .query_row(
                &format!(
                    "INSERT INTO users (nombre, apellido, estado, profesion, password_hash, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                     RETURNING {USER_COLUMNS}"
                ),
                params![
                    new_user.first_name,
                    new_user.last_name,
                    new_user.status.as_str(),
                    new_user.profession,
                    new_user.password_hash,
                    now,
                ],
                user_from_row,
            )
            .context("Failed to insert user")?;

        info!("✅ Created user {} ({} {})", user.id, user.first_name, user.last_name);

        Ok(user)
    }

    /// Apply `changes` to user `id` in one statement. `None` when no such user.
    pub fn update_user(&self, id: i64, changes: &UserChanges) -> Result<Option<User>> {
        let conn = self.conn.lock();

        let user = conn
            .query_row(
                &format!(
                    "UPDATE users SET
                        nombre = COALESCE(?1, nombre),
                        apellido = COALESCE(?2, apellido),
                        estado = COALESCE(?3, estado),
                        profesion = COALESCE(?4, profesion),
                        password_hash = COALESCE(?5, password_hash),
                        updated_at = ?6
                     WHERE id = ?7
                     RETURNING {USER_COLUMNS}"
                ),
                params![
                    changes.first_name,
                    changes.last_name,
                    changes.status.map(|s| s.as_str()),
                    changes.profession,
                    changes.password_hash,
                    Utc::now(),
                    id,
                ],
                user_from_row,
            )
            .optional()
            .context("Failed to update user")?;

        Ok(user)
    }

    /// Delete a user by id. Returns whether a row was removed.
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock();

        let rows_affected = conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])
            .context("Failed to delete user")?;

        if rows_affected > 0 {
            info!("🗑️  Deleted user: {}", id);
        }

        Ok(rows_affected > 0)
    }
}

/// Initialize database schema
fn init_db(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL,
            apellido TEXT NOT NULL,
            estado TEXT NOT NULL DEFAULT 'activo',
            profesion TEXT,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create users table")?;

    Ok(())
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let status: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        status: UserStatus::parse(&status).unwrap_or_default(),
        profession: row.get(4)?,
        password_hash: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
