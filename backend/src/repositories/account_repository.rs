//! Database repository for account management operations.
//!
//! [`AccountDirectory`] is the persistence contract the services depend on;
//! [`AccountRepository`] implements it on SQLite. Email uniqueness is owned by
//! the unique index on `users.email`: a losing concurrent insert surfaces as
//! [`DirectoryError::DuplicateEmail`] no matter what the caller checked
//! beforehand.

use crate::database::models::{Account, AccountUpdate, CreateAccount, Role};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Account already exists: {0}")]
    DuplicateEmail(String),
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("Corrupt account record: {0}")]
    Corrupt(String),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Persistent store of user accounts.
///
/// Mutating operations report the number of affected rows; zero means no
/// account matched.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn create(&self, account: CreateAccount) -> DirectoryResult<Account>;

    async fn find_by_email(&self, email: &str) -> DirectoryResult<Option<Account>>;

    async fn find_by_id(&self, id: &str) -> DirectoryResult<Option<Account>>;

    async fn list_all(&self) -> DirectoryResult<Vec<Account>>;

    async fn update_fields(&self, id: &str, update: AccountUpdate) -> DirectoryResult<u64>;

    /// Marks the unverified account with this email as verified.
    async fn set_verified(&self, email: &str) -> DirectoryResult<u64>;

    async fn delete(&self, id: &str) -> DirectoryResult<u64>;
}

#[derive(Debug, FromRow)]
struct AccountRow {
    id: String,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    verified: bool,
    phone_number: Option<i64>,
    bvn: Option<i64>,
    health_plan: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = DirectoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| DirectoryError::Corrupt(format!("{} (account {})", e, row.id)))?;

        Ok(Account {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            password_hash: row.password_hash,
            verified: row.verified,
            phone_number: row.phone_number,
            bvn: row.bvn,
            health_plan: row.health_plan,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_ACCOUNT: &str = r#"
    SELECT id, email, first_name, last_name, password_hash, verified,
           phone_number, bvn, health_plan, role, created_at, updated_at
    FROM users
"#;

/// Repository for account database operations.
///
/// Handles all persistence operations for the Account entity.
#[derive(Clone)]
pub struct AccountRepository {
    /// Shared SQLite connection pool
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository instance.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, column: &str, value: &str) -> DirectoryResult<Option<Account>> {
        let sql = format!("{} WHERE {} = ?", SELECT_ACCOUNT, column);
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Account::try_from).transpose()
    }
}

#[async_trait]
impl AccountDirectory for AccountRepository {
    async fn create(&self, account: CreateAccount) -> DirectoryResult<Account> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, first_name, last_name, password_hash, verified, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&account.email)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.password_hash)
        .bind(account.verified)
        .bind(account.role.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(DirectoryError::DuplicateEmail(account.email));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Account {
            id,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            password_hash: account.password_hash,
            verified: account.verified,
            phone_number: None,
            bvn: None,
            health_plan: None,
            role: account.role,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_email(&self, email: &str) -> DirectoryResult<Option<Account>> {
        self.fetch_one_where("email", email).await
    }

    async fn find_by_id(&self, id: &str) -> DirectoryResult<Option<Account>> {
        self.fetch_one_where("id", id).await
    }

    async fn list_all(&self) -> DirectoryResult<Vec<Account>> {
        let sql = format!("{} ORDER BY created_at ASC", SELECT_ACCOUNT);
        let rows = sqlx::query_as::<_, AccountRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Account::try_from).collect()
    }

    async fn update_fields(&self, id: &str, update: AccountUpdate) -> DirectoryResult<u64> {
        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE users SET updated_at = ");
        builder.push_bind(Utc::now());

        if let Some(phone_number) = update.phone_number {
            builder.push(", phone_number = ").push_bind(phone_number);
        }
        if let Some(bvn) = update.bvn {
            builder.push(", bvn = ").push_bind(bvn);
        }
        if let Some(health_plan) = update.health_plan {
            builder.push(", health_plan = ").push_bind(health_plan);
        }

        builder.push(" WHERE id = ").push_bind(id.to_string());

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn set_verified(&self, email: &str) -> DirectoryResult<u64> {
        let result = sqlx::query(
            "UPDATE users SET verified = 1, updated_at = ? WHERE email = ? AND verified = 0",
        )
        .bind(Utc::now())
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &str) -> DirectoryResult<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    async fn repository() -> AccountRepository {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        AccountRepository::new(db.pool().clone())
    }

    fn new_account(email: &str) -> CreateAccount {
        CreateAccount {
            email: email.to_string(),
            first_name: "test".to_string(),
            last_name: "user".to_string(),
            password_hash: "$2b$10$notarealhash".to_string(),
            verified: false,
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = repository().await;
        let created = repo.create(new_account("a@b.com")).await.unwrap();
        assert!(Uuid::parse_str(&created.id).is_ok());
        assert!(!created.verified);
        assert_eq!(created.role, Role::User);

        let by_email = repo.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        let by_id = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@b.com");
        assert!(repo.find_by_email("x@b.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_by_store() {
        let repo = repository().await;
        repo.create(new_account("dup@b.com")).await.unwrap();

        let err = repo.create(new_account("dup@b.com")).await.unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateEmail(ref email) if email == "dup@b.com"));
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_fields_is_partial() {
        let repo = repository().await;
        let created = repo.create(new_account("a@b.com")).await.unwrap();

        let affected = repo
            .update_fields(
                &created.id,
                AccountUpdate {
                    phone_number: Some(2347034568886),
                    bvn: Some(12345678901),
                    health_plan: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let affected = repo
            .update_fields(
                &created.id,
                AccountUpdate {
                    health_plan: Some("Gold".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let stored = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.phone_number, Some(2347034568886));
        assert_eq!(stored.bvn, Some(12345678901));
        assert_eq!(stored.health_plan.as_deref(), Some("Gold"));

        let missing = repo
            .update_fields("no-such-id", AccountUpdate::default())
            .await
            .unwrap();
        assert_eq!(missing, 0);
    }

    #[tokio::test]
    async fn test_set_verified_only_once() {
        let repo = repository().await;
        repo.create(new_account("a@b.com")).await.unwrap();

        assert_eq!(repo.set_verified("a@b.com").await.unwrap(), 1);
        assert_eq!(repo.set_verified("a@b.com").await.unwrap(), 0);
        assert_eq!(repo.set_verified("ghost@b.com").await.unwrap(), 0);
        assert!(repo.find_by_email("a@b.com").await.unwrap().unwrap().verified);
    }

    #[tokio::test]
    async fn test_delete_is_permanent() {
        let repo = repository().await;
        let created = repo.create(new_account("a@b.com")).await.unwrap();

        assert_eq!(repo.delete(&created.id).await.unwrap(), 1);
        assert_eq!(repo.delete(&created.id).await.unwrap(), 0);
        assert!(repo.find_by_id(&created.id).await.unwrap().is_none());

        // The email is free again once the row is gone.
        repo.create(new_account("a@b.com")).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_all_preserves_roles() {
        let repo = repository().await;
        repo.create(new_account("user@b.com")).await.unwrap();
        repo.create(CreateAccount {
            role: Role::SuperAdmin,
            ..new_account("root@b.com")
        })
        .await
        .unwrap();

        let accounts = repo.list_all().await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert!(accounts.iter().any(|a| a.role == Role::SuperAdmin));
    }
}
