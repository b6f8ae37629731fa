use crate::db::models::{Customer, CustomerId, DbUser, NewCustomer};
use crate::db::schema::SQLITE_INIT;
use crate::error::CrmError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct CrmStorage {
    pool: SqlitePool,
}

impl CrmStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database with a single long-lived connection, creating the
    /// file if missing, and apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self, CrmError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_opts)
            .await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), CrmError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a user unless the username is taken. Returns whether a row was written.
    pub async fn insert_user(&self, username: &str, password_hash: &str) -> Result<bool, CrmError> {
        let res = sqlx::query(
            "INSERT INTO users (username, password) VALUES (?, ?) ON CONFLICT(username) DO NOTHING",
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    pub async fn get_user(&self, username: &str) -> Result<Option<DbUser>, CrmError> {
        let user = sqlx::query_as::<_, DbUser>(
            "SELECT username, password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn insert_customer(&self, customer: &NewCustomer) -> Result<CustomerId, CrmError> {
        let res = sqlx::query(
            "INSERT INTO customers (name, email, phone, notes) VALUES (?, ?, ?, ?)",
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.notes)
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, CrmError> {
        let rows = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, notes FROM customers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// ASCII case-insensitive substring match on name, email or phone.
    /// `%`, `_` and `\` in `term` match literally.
    pub async fn search_customers(&self, term: &str) -> Result<Vec<Customer>, CrmError> {
        let pattern = format!("%{}%", escape_like(term));
        let rows = sqlx::query_as::<_, Customer>(
            r#"SELECT id, name, email, phone, notes FROM customers
               WHERE name LIKE ?1 ESCAPE '\'
                  OR email LIKE ?1 ESCAPE '\'
                  OR phone LIKE ?1 ESCAPE '\'
               ORDER BY id"#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_storage() -> CrmStorage {
        CrmStorage::connect("sqlite::memory:")
            .await
            .expect("open in-memory sqlite")
    }

    async fn seed(storage: &CrmStorage) {
        for (name, email, phone) in [
            ("Alice Smith", "alice@example.com", "555-0100"),
            ("Bob Jones", "bob@corp.io", ""),
            ("Carol 100% Real", "carol_r@example.com", "555-0199"),
        ] {
            storage
                .insert_customer(&NewCustomer::from_raw(name, email, phone, ""))
                .await
                .expect("insert customer");
        }
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[tokio::test]
    async fn schema_init_is_idempotent() {
        let storage = memory_storage().await;
        storage.init_schema().await.expect("second init");
        storage.init_schema().await.expect("third init");
    }

    #[tokio::test]
    async fn insert_user_rejects_duplicate_username() {
        let storage = memory_storage().await;
        assert!(storage.insert_user("alice", "h1").await.unwrap());
        assert!(!storage.insert_user("alice", "h2").await.unwrap());

        let user = storage.get_user("alice").await.unwrap().expect("user row");
        assert_eq!(user.password_hash, "h1");
        assert!(storage.get_user("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_in_insertion_order_with_fresh_ids() {
        let storage = memory_storage().await;
        seed(&storage).await;

        let all = storage.list_customers().await.unwrap();
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Alice Smith", "Bob Jones", "Carol 100% Real"]);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(all[1].phone, None);
    }

    #[tokio::test]
    async fn search_matches_any_field_case_insensitively() {
        let storage = memory_storage().await;
        seed(&storage).await;

        let by_name = storage.search_customers("SMITH").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Alice Smith");

        let by_email = storage.search_customers("corp.IO").await.unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].name, "Bob Jones");

        let by_phone = storage.search_customers("555-01").await.unwrap();
        assert_eq!(by_phone.len(), 2);

        assert!(storage.search_customers("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_empty_term_returns_everything() {
        let storage = memory_storage().await;
        seed(&storage).await;

        let all = storage.list_customers().await.unwrap();
        assert_eq!(storage.search_customers("").await.unwrap(), all);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let storage = memory_storage().await;
        seed(&storage).await;

        let pct = storage.search_customers("100%").await.unwrap();
        assert_eq!(pct.len(), 1);
        assert_eq!(pct[0].name, "Carol 100% Real");

        let underscore = storage.search_customers("_").await.unwrap();
        assert_eq!(underscore.len(), 1);
        assert_eq!(underscore[0].email, "carol_r@example.com");

        assert!(storage.search_customers("%%%").await.unwrap().is_empty());
    }
}
