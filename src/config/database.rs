//! Database configuration module for `VoiceBuddy`.
//!
//! Handles `SQLite` connection setup and table creation using `SeaORM`.
//! Schema comes straight from the entity definitions via
//! `Schema::create_table_from_entity`, so the database always matches the
//! Rust structs without hand-written SQL. Table creation is idempotent
//! (`IF NOT EXISTS`) because it runs on every startup.

use crate::entities::{ChannelSwitch, ChannelTotal, RunningAverage, VoiceSession, Warning};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Default `SQLite` location when `DATABASE_URL` is not set.
/// `mode=rwc` creates the file on first run.
const DEFAULT_DATABASE_URL: &str = "sqlite://data/voice_buddy.sqlite?mode=rwc";

/// Gets the database URL from the environment or the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`,
/// falling back to a local `SQLite` file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions, skipping any that
/// already exist.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut sessions = schema.create_table_from_entity(VoiceSession);
    sessions.if_not_exists();
    db.execute(builder.build(&sessions)).await?;

    let mut totals = schema.create_table_from_entity(ChannelTotal);
    totals.if_not_exists();
    db.execute(builder.build(&totals)).await?;

    let mut averages = schema.create_table_from_entity(RunningAverage);
    averages.if_not_exists();
    db.execute(builder.build(&averages)).await?;

    let mut switches = schema.create_table_from_entity(ChannelSwitch);
    switches.if_not_exists();
    db.execute(builder.build(&switches)).await?;

    let mut warnings = schema.create_table_from_entity(Warning);
    warnings.if_not_exists();
    db.execute(builder.build(&warnings)).await?;

    Ok(())
}
