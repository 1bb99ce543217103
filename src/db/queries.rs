use crate::db::Database;
use crate::error::Result;
use crate::logic::estimator::TrainingSample;
use rusqlite::{params, Row};

// Historical sample queries

impl Database {
    /// Inserts a batch of samples in one transaction. Every row is validated
    /// first, so an invalid row leaves the store untouched.
    pub fn insert_historical_samples(
        &self,
        samples: &[TrainingSample],
        source: &str,
    ) -> Result<usize> {
        for sample in samples {
            sample.validate()?;
        }

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    r#"
                    INSERT INTO historical_samples
                        (annual_rain_mm, soil_moisture, temp_c, groundwater_depth_m,
                         available_water_mm, source)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                )?;
                for s in samples {
                    stmt.execute(params![
                        s.annual_rain_mm,
                        s.soil_moisture,
                        s.temp_c,
                        s.groundwater_depth_m,
                        s.available_water_mm,
                        source,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(samples.len())
        })
    }

    pub fn load_historical_samples(&self) -> Result<Vec<TrainingSample>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT annual_rain_mm, soil_moisture, temp_c, groundwater_depth_m,
                       available_water_mm
                FROM historical_samples
                ORDER BY id
                "#,
            )?;
            let rows = stmt.query_map([], row_to_sample)?;
            let samples = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(samples)
        })
    }

    pub fn count_historical_samples(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM historical_samples", [], |row| {
                    row.get(0)
                })?;
            Ok(count as usize)
        })
    }
}

fn row_to_sample(row: &Row) -> rusqlite::Result<TrainingSample> {
    Ok(TrainingSample {
        annual_rain_mm: row.get(0)?,
        soil_moisture: row.get(1)?,
        temp_c: row.get(2)?,
        groundwater_depth_m: row.get(3)?,
        available_water_mm: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WaterWalletError;

    #[test]
    fn insert_and_load_in_order() {
        let db = Database::open_in_memory().unwrap();
        let rows = vec![
            TrainingSample::new(3000.0, 0.9, 26.0, 3.0, 2800.0),
            TrainingSample::new(400.0, 0.2, 42.0, 24.0, 300.0),
        ];
        assert_eq!(db.insert_historical_samples(&rows, "test").unwrap(), 2);
        assert_eq!(db.count_historical_samples().unwrap(), 2);
        assert_eq!(db.load_historical_samples().unwrap(), rows);
    }

    #[test]
    fn invalid_row_rejects_whole_batch() {
        let db = Database::open_in_memory().unwrap();
        let rows = vec![
            TrainingSample::new(3000.0, 0.9, 26.0, 3.0, 2800.0),
            TrainingSample::new(400.0, 1.2, 42.0, 24.0, 300.0),
        ];
        assert!(matches!(
            db.insert_historical_samples(&rows, "test"),
            Err(WaterWalletError::InvalidData(_))
        ));
        assert_eq!(db.count_historical_samples().unwrap(), 0);
    }

    #[test]
    fn empty_store_loads_nothing() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_historical_samples().unwrap().is_empty());
    }
}
