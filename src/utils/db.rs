use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
    SqlErr,
};

use crate::data::error::Error;
use crate::entity::{
    hackathon_experience, skill, user, user_desired_skill, user_known_skill, user_skill,
};

pub trait StanderizeError<V> {
    fn warn_err(self) -> Result<V, Error>;
}

impl<V, E> StanderizeError<V> for Result<V, E>
where
    E: std::error::Error,
{
    fn warn_err(self) -> Result<V, Error> {
        self.map_err(|e| {
            tracing::warn!("{}", e);
            Error::InternalServerError
        })
    }
}

pub trait UniqueViolation<V> {
    /// Map a unique-constraint violation to `on_conflict`, anything else as `warn_err`.
    fn unique_err(self, on_conflict: Error) -> Result<V, Error>;
}

impl<V> UniqueViolation<V> for Result<V, DbErr> {
    fn unique_err(self, on_conflict: Error) -> Result<V, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(detail)) => {
                    tracing::debug!("unique constraint violated: {}", detail);
                    Err(on_conflict)
                }
                _ => Err(e).warn_err(),
            },
        }
    }
}

pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url);
    if url.starts_with("sqlite") {
        // every pooled connection to an in-memory sqlite database is a new database
        options.max_connections(1).min_connections(1);
    }
    options.sqlx_logging(false);

    Database::connect(options).await
}

async fn create_table<C, E>(conn: &C, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = conn.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    conn.execute(backend.build(&statement)).await?;

    Ok(())
}

/// Create every table that does not exist yet. Parents go first so foreign keys resolve.
pub async fn ensure_schema<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let schema = Schema::new(conn.get_database_backend());

    create_table(conn, &schema, user::Entity).await?;
    create_table(conn, &schema, skill::Entity).await?;
    create_table(conn, &schema, hackathon_experience::Entity).await?;
    create_table(conn, &schema, user_skill::Entity).await?;
    create_table(conn, &schema, user_known_skill::Entity).await?;
    create_table(conn, &schema, user_desired_skill::Entity).await?;

    tracing::debug!("database schema is in place");
    Ok(())
}
