use super::{User, UserPatch};
use crate::{Error, Result};
use chrono::Utc;
use libsql::{Builder, Connection, Database, Value};
use tracing::{debug, info, warn};

/// CRUD access to the `users` table.
///
/// Every operation runs inside its own transaction: commit on success,
/// rollback on any error, and the error propagates to the caller. The
/// database file (or `:memory:`) is opened once; connections are cheap
/// handles onto it.
pub struct UserStore {
    db: Database,
}

impl UserStore {
    pub async fn new(db_path: &str) -> Result<Self> {
        let db = Builder::new_local(db_path).build().await?;

        // Not for production; a real deployment would run migrations instead.
        let conn = db.connect()?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                age INTEGER,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            "#,
            (),
        )
        .await?;

        info!("User database initialized: {}", db_path);
        Ok(Self { db })
    }

    pub async fn create(&self, name: &str, email: &str, age: Option<u32>) -> Result<User> {
        let conn = self.db.connect()?;
        let tx = conn.transaction().await?;

        match Self::insert_user(&tx, name, email, age).await {
            Ok(user) => {
                tx.commit().await?;
                debug!("Created user {}", user.id);
                Ok(user)
            }
            Err(e) => {
                rollback(tx).await;
                Err(e)
            }
        }
    }

    pub async fn get(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.db.connect()?;
        Self::fetch_user(&conn, user_id).await
    }

    pub async fn update(&self, user_id: i64, patch: UserPatch) -> Result<Option<User>> {
        let conn = self.db.connect()?;
        let tx = conn.transaction().await?;

        match Self::apply_patch(&tx, user_id, patch).await {
            Ok(Some(user)) => {
                tx.commit().await?;
                debug!("Updated user {}", user.id);
                Ok(Some(user))
            }
            Ok(None) => {
                rollback(tx).await;
                Ok(None)
            }
            Err(e) => {
                rollback(tx).await;
                Err(e)
            }
        }
    }

    pub async fn delete(&self, user_id: i64) -> Result<bool> {
        let conn = self.db.connect()?;
        let tx = conn.transaction().await?;

        let result = tx
            .execute("DELETE FROM users WHERE id = ?", [user_id])
            .await;

        match result {
            Ok(0) => {
                rollback(tx).await;
                Ok(false)
            }
            Ok(_) => {
                tx.commit().await?;
                debug!("Deleted user {}", user_id);
                Ok(true)
            }
            Err(e) => {
                rollback(tx).await;
                Err(e.into())
            }
        }
    }

    async fn insert_user(
        conn: &Connection,
        name: &str,
        email: &str,
        age: Option<u32>,
    ) -> Result<User> {
        let now = Utc::now();
        conn.execute(
            "INSERT INTO users (name, email, age, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            (
                name,
                email,
                age_to_value(age),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )
        .await?;

        let id = conn.last_insert_rowid();
        Self::fetch_user(conn, id)
            .await?
            .ok_or_else(|| Error::internal(format!("inserted user {} not readable back", id)))
    }

    async fn apply_patch(
        conn: &Connection,
        user_id: i64,
        patch: UserPatch,
    ) -> Result<Option<User>> {
        let Some(current) = Self::fetch_user(conn, user_id).await? else {
            return Ok(None);
        };

        let name = patch.name.unwrap_or(current.name);
        let email = patch.email.unwrap_or(current.email);
        let age = patch.age.or(current.age);
        let now = Utc::now();

        conn.execute(
            "UPDATE users SET name = ?, email = ?, age = ?, updated_at = ? WHERE id = ?",
            (
                name.as_str(),
                email.as_str(),
                age_to_value(age),
                now.to_rfc3339(),
                user_id,
            ),
        )
        .await?;

        Self::fetch_user(conn, user_id).await
    }

    async fn fetch_user(conn: &Connection, user_id: i64) -> Result<Option<User>> {
        let mut rows = conn
            .query(
                "SELECT id, name, email, age, created_at, updated_at FROM users WHERE id = ?",
                [user_id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(read_user(&row)?)),
            None => Ok(None),
        }
    }
}

async fn rollback(tx: libsql::Transaction) {
    if let Err(e) = tx.rollback().await {
        warn!("Transaction rollback failed: {}", e);
    }
}

fn age_to_value(age: Option<u32>) -> Value {
    match age {
        Some(age) => Value::Integer(i64::from(age)),
        None => Value::Null,
    }
}

fn read_user(row: &libsql::Row) -> Result<User> {
    let age = match row.get_value(3)? {
        Value::Null => None,
        Value::Integer(n) => Some(u32::try_from(n).map_err(|_| {
            Error::internal(format!("stored age {} out of range", n))
        })?),
        other => {
            return Err(Error::internal(format!(
                "unexpected value in age column: {:?}",
                other
            )))
        }
    };

    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        age,
        created_at: parse_timestamp(&row.get::<String>(4)?)?,
        updated_at: parse_timestamp(&row.get::<String>(5)?)?,
    })
}

fn parse_timestamp(raw: &str) -> Result<chrono::DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::internal(format!("Failed to parse timestamp: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let store = UserStore::new(":memory:").await.unwrap();

        let before = Utc::now();
        let user = store
            .create("Jane Doe", "janedoe@example.com", Some(28))
            .await
            .unwrap();
        let after = Utc::now();

        assert!(user.id > 0);
        assert_eq!(user.name, "Jane Doe");
        assert_eq!(user.email, "janedoe@example.com");
        assert_eq!(user.age, Some(28));
        assert!(user.created_at >= before && user.created_at <= after);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[tokio::test]
    async fn test_create_without_age() {
        let store = UserStore::new(":memory:").await.unwrap();
        let user = store.create("No Age", "noage@example.com", None).await.unwrap();

        assert_eq!(user.age, None);
        let fetched = store.get(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.age, None);
    }

    #[tokio::test]
    async fn test_get_missing_user_is_none() {
        let store = UserStore::new(":memory:").await.unwrap();
        assert!(store.get(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_partial_update_preserves_other_fields() {
        let store = UserStore::new(":memory:").await.unwrap();
        let user = store
            .create("Jane Doe", "janedoe@example.com", Some(28))
            .await
            .unwrap();

        let patch = UserPatch {
            age: Some(29),
            ..Default::default()
        };
        let updated = store.update(user.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.name, "Jane Doe");
        assert_eq!(updated.email, "janedoe@example.com");
        assert_eq!(updated.age, Some(29));
        assert!(updated.updated_at >= user.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_user_does_not_create() {
        let store = UserStore::new(":memory:").await.unwrap();

        let patch = UserPatch {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };
        assert!(store.update(12345, patch).await.unwrap().is_none());
        assert!(store.get(12345).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_round_trip() {
        let store = UserStore::new(":memory:").await.unwrap();
        let user = store
            .create("To Delete", "delete@example.com", None)
            .await
            .unwrap();

        assert!(store.delete(user.id).await.unwrap());
        assert!(store.get(user.id).await.unwrap().is_none());
        assert!(!store.delete(user.id).await.unwrap());
    }
}
