use crate::db::Database;
use crate::error::Result;

const MIGRATIONS: &[&str] = &[
    // Migration 1: Historical training samples
    r#"
    CREATE TABLE IF NOT EXISTS historical_samples (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        annual_rain_mm REAL NOT NULL,
        soil_moisture REAL NOT NULL,
        temp_c REAL NOT NULL,
        groundwater_depth_m REAL NOT NULL,
        available_water_mm REAL NOT NULL,
        source TEXT,
        imported_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    // Migration 2: Source index for per-import bookkeeping
    r#"
    CREATE INDEX IF NOT EXISTS idx_historical_samples_source
        ON historical_samples(source);
    "#,
];

pub fn run(db: &Database) -> Result<()> {
    db.with_conn_mut(|conn| {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;

        let current_version: i32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current_version {
                tracing::info!("Applying migration {}", version);
                conn.execute_batch(migration)?;
                conn.execute(
                    "INSERT INTO schema_migrations (version) VALUES (?1)",
                    [version],
                )?;
            }
        }

        Ok(())
    })
}
