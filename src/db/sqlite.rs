use crate::db::models::{DbPassenger, DbTodo, NewPassenger};
use crate::db::query::{PassengerQuery, Selection};
use crate::db::schema::SQLITE_INIT;
use crate::error::DeskError;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Pool, Row, Sqlite};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info};

pub type SqlitePool = Pool<Sqlite>;

/// Open the pool and apply the bundled DDL.
///
/// In-memory URLs get a single connection that is never recycled, since every
/// SQLite memory connection is its own database.
pub async fn connect(database_url: &str) -> Result<SqlitePool, DeskError> {
    let in_memory = database_url.contains(":memory:");
    let mut connect_opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    let pool_opts = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        connect_opts = connect_opts
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
        SqlitePoolOptions::new()
    };

    let pool = pool_opts.connect_with(connect_opts).await?;
    init_schema(&pool).await?;
    info!(in_memory, "record store initialized");
    Ok(pool)
}

/// Initialize the schema by executing the bundled DDL.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), DeskError> {
    // execute multiple statements one by one (sqlx::query runs a single statement)
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct TodoStore {
    pool: SqlitePool,
}

impl TodoStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<DbTodo>, DeskError> {
        let rows = sqlx::query("SELECT id, title, completed FROM todos ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<DbTodo>, DeskError> {
        let row = sqlx::query("SELECT id, title, completed FROM todos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Insert a todo and return the stored row.
    pub async fn insert(&self, title: Option<&str>, completed: bool) -> Result<DbTodo, DeskError> {
        let completed_i = if completed { 1 } else { 0 };
        let result = sqlx::query("INSERT INTO todos (title, completed) VALUES (?, ?)")
            .bind(title)
            .bind(completed_i)
            .execute(&self.pool)
            .await?;
        Ok(DbTodo {
            id: result.last_insert_rowid(),
            title: title.map(str::to_string),
            completed,
        })
    }

    pub async fn set_completed(&self, id: i64, completed: bool) -> Result<u64, DeskError> {
        let completed_i = if completed { 1 } else { 0 };
        let result = sqlx::query("UPDATE todos SET completed = ? WHERE id = ?")
            .bind(completed_i)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<u64, DeskError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    fn row_to_model(row: SqliteRow) -> Result<DbTodo, DeskError> {
        let id: i64 = row.try_get("id")?;
        let title: Option<String> = row.try_get("title")?;
        let completed_i: i64 = row.try_get("completed")?;
        Ok(DbTodo {
            id,
            title,
            completed: completed_i != 0,
        })
    }
}

const PASSENGER_COLUMNS: &str = r#"id, first_name, last_name, email, phone, passport_number,
    nationality, date_of_birth, seat_number, flight_number, departure_city,
    arrival_city, departure_date, ticket_class, price, status, created_at"#;

#[derive(Clone)]
pub struct PassengerStore {
    pool: SqlitePool,
}

impl PassengerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<DbPassenger>, DeskError> {
        let sql = format!("SELECT {PASSENGER_COLUMNS} FROM passengers ORDER BY id");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    /// Evaluate `query` against the full row set.
    pub async fn select(&self, query: &PassengerQuery) -> Result<Selection, DeskError> {
        let rows = self.list_all().await?;
        let scanned = rows.len();
        let selection = query.apply(rows);
        let columns: Vec<&str> = query.filters().iter().map(|(f, _)| f.column()).collect();
        debug!(
            scanned,
            matched = selection.matched,
            ?columns,
            "passenger selection evaluated in memory"
        );
        Ok(selection)
    }

    pub async fn count(&self) -> Result<i64, DeskError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM passengers")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    pub async fn is_empty(&self) -> Result<bool, DeskError> {
        let rec: (i64,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM passengers)")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0 == 0)
    }

    /// Insert one passenger. Returns the row id.
    pub async fn insert(&self, p: &NewPassenger) -> Result<i64, DeskError> {
        let result = sqlx::query(
            r#"
            INSERT INTO passengers (
                first_name, last_name, email, phone, passport_number, nationality,
                date_of_birth, seat_number, flight_number, departure_city, arrival_city,
                departure_date, ticket_class, price, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&p.first_name)
        .bind(&p.last_name)
        .bind(&p.email)
        .bind(&p.phone)
        .bind(&p.passport_number)
        .bind(&p.nationality)
        .bind(&p.date_of_birth)
        .bind(&p.seat_number)
        .bind(&p.flight_number)
        .bind(&p.departure_city)
        .bind(&p.arrival_city)
        .bind(&p.departure_date)
        .bind(&p.ticket_class)
        .bind(&p.price)
        .bind(&p.status)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn delete_all(&self) -> Result<u64, DeskError> {
        let result = sqlx::query("DELETE FROM passengers")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    fn row_to_model(row: SqliteRow) -> Result<DbPassenger, DeskError> {
        let created_at_str: String = row.try_get("created_at")?;
        let created_at = parse_timestamp(&created_at_str)?;

        Ok(DbPassenger {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            passport_number: row.try_get("passport_number")?,
            nationality: row.try_get("nationality")?,
            date_of_birth: row.try_get("date_of_birth")?,
            seat_number: row.try_get("seat_number")?,
            flight_number: row.try_get("flight_number")?,
            departure_city: row.try_get("departure_city")?,
            arrival_city: row.try_get("arrival_city")?,
            departure_date: row.try_get("departure_date")?,
            ticket_class: row.try_get("ticket_class")?,
            price: row.try_get("price")?,
            status: row.try_get("status")?,
            created_at,
        })
    }
}

/// Accepts RFC3339 (written by the service) and SQLite's `CURRENT_TIMESTAMP` format.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DeskError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    Ok(naive.and_utc())
}
