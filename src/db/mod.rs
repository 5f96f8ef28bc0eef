use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPool;
use sqlx::sqlite::SqlitePool;
use sqlx::Error;

// Runs the same sqlx expression against whichever backend the pool holds.
// Queries use `$N` placeholders, which both drivers accept.
macro_rules! with_pool {
    ($pool:expr, $conn:ident => $body:expr) => {
        match $pool {
            $crate::db::DbPool::Postgres($conn) => $body,
            $crate::db::DbPool::Sqlite($conn) => $body,
        }
    };
}

pub mod queries;

pub use queries::categories::Category;
pub use queries::questions::{NewQuestion, Question};

/// Connection pool for the trivia store.
///
/// Production runs against Postgres; a `sqlite:` URL selects SQLite, which is
/// what local tooling and the test suite use.
#[derive(Clone, Debug)]
pub enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    pub async fn connect(url: &SecretString) -> Result<Self, Error> {
        let url = url.expose_secret();
        if url.starts_with("sqlite:") {
            Ok(Self::Sqlite(SqlitePool::connect(url).await?))
        } else {
            Ok(Self::Postgres(PgPool::connect(url).await?))
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Sqlite(_) => "sqlite",
        }
    }
}
