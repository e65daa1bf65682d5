use crate::db::{NewPassenger, PassengerField, PassengerQuery, PassengerStore};
use crate::error::DeskError;
use crate::service::ingest::{generated_flight_number, parse_passenger_csv};
use crate::service::stats::summarize;
use crate::types::tools::{
    ClearResult, ImportResult, PassengerFilters, PassengerList, PassengerStats,
};
use tracing::{info, warn};

/// Dataset loaded by `populate_test_data`.
pub const SAMPLE_PASSENGERS_CSV: &str = include_str!("../../data/sample_passengers.csv");

#[derive(Clone)]
pub struct PassengerOps {
    store: PassengerStore,
}

impl PassengerOps {
    pub fn new(store: PassengerStore) -> Self {
        Self { store }
    }

    pub async fn get_passengers(
        &self,
        filters: PassengerFilters,
    ) -> Result<PassengerList, DeskError> {
        let query = query_from_filters(filters);
        let selection = self.store.select(&query).await?;
        let message = match query.limit() {
            Some(limit) if selection.matched > limit => format!(
                "Found {} passengers ({}), showing first {}",
                selection.matched, query, limit
            ),
            _ => format!("Found {} passengers ({})", selection.matched, query),
        };
        Ok(PassengerList {
            passengers: selection.rows,
            total_count: selection.matched,
            message,
        })
    }

    pub async fn get_passenger_stats(&self) -> Result<PassengerStats, DeskError> {
        let rows = self.store.list_all().await?;
        Ok(summarize(&rows))
    }

    /// Insert rows one by one, in order. A failure leaves earlier rows in place.
    pub async fn import_passengers(&self, rows: Vec<NewPassenger>) -> Result<usize, DeskError> {
        let mut imported = 0;
        for (index, mut row) in rows.into_iter().enumerate() {
            if row.flight_number.is_none() {
                // Counter restarts on every import call.
                row.flight_number = Some(generated_flight_number(index + 1));
            }
            if let Err(e) = self.store.insert(&row).await {
                warn!(imported, error = %e, "passenger import stopped part way");
                return Err(e);
            }
            imported += 1;
        }
        Ok(imported)
    }

    pub async fn import_passengers_from_csv(
        &self,
        csv_content: &str,
    ) -> Result<ImportResult, DeskError> {
        let rows = parse_passenger_csv(csv_content);
        let parsed = rows.len();
        let imported_count = self.import_passengers(rows).await?;
        info!(parsed, imported_count, "imported passengers from CSV");
        Ok(ImportResult {
            success: true,
            imported_count,
            message: format!("Imported {imported_count} passengers"),
        })
    }

    pub async fn clear_database(&self) -> Result<ClearResult, DeskError> {
        let existing = self.store.count().await?;
        let deleted_count = self.store.delete_all().await?;
        info!(existing, deleted_count, "cleared passengers");
        Ok(ClearResult {
            success: true,
            deleted_count,
            message: format!("Deleted {deleted_count} passengers"),
        })
    }

    /// Load the bundled dataset into an empty table; refuses when any row exists.
    pub async fn populate_test_data(&self) -> Result<ImportResult, DeskError> {
        if !self.store.is_empty().await? {
            let existing = self.store.count().await?;
            info!(existing, "test data already present; skipping");
            return Ok(ImportResult {
                success: true,
                imported_count: 0,
                message: format!("Table already holds {existing} passengers; nothing loaded"),
            });
        }
        let mut result = self.import_passengers_from_csv(SAMPLE_PASSENGERS_CSV).await?;
        result.message = format!("Loaded {} sample passengers", result.imported_count);
        Ok(result)
    }
}

fn query_from_filters(filters: PassengerFilters) -> PassengerQuery {
    PassengerQuery::new()
        .with_optional_filter(PassengerField::FlightNumber, filters.flight_number)
        .with_optional_filter(PassengerField::DepartureCity, filters.departure_city)
        .with_optional_filter(PassengerField::ArrivalCity, filters.arrival_city)
        .with_optional_filter(PassengerField::TicketClass, filters.ticket_class)
        .with_optional_filter(PassengerField::Status, filters.status)
        .with_limit(filters.limit.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect;
    use crate::service::ingest::PASSENGER_COLUMNS;

    async fn ops() -> PassengerOps {
        let pool = connect("sqlite::memory:").await.expect("in-memory store");
        PassengerOps::new(PassengerStore::new(pool))
    }

    #[test]
    fn sample_dataset_matches_column_layout() {
        let header = SAMPLE_PASSENGERS_CSV.lines().next().unwrap();
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        assert_eq!(columns, PASSENGER_COLUMNS);
        assert!(parse_passenger_csv(SAMPLE_PASSENGERS_CSV).len() >= 30);
    }

    #[tokio::test]
    async fn populate_is_guarded() {
        let ops = ops().await;
        let first = ops.populate_test_data().await.unwrap();
        assert!(first.success);
        assert!(first.imported_count > 0);

        let second = ops.populate_test_data().await.unwrap();
        assert!(second.success);
        assert_eq!(second.imported_count, 0);

        let stats = ops.get_passenger_stats().await.unwrap();
        assert_eq!(stats.total_passengers, first.imported_count);
    }

    #[tokio::test]
    async fn clear_on_empty_store_succeeds() {
        let ops = ops().await;
        let result = ops.clear_database().await.unwrap();
        assert!(result.success);
        assert_eq!(result.deleted_count, 0);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let ops = ops().await;
        let loaded = ops.populate_test_data().await.unwrap().imported_count;
        let cleared = ops.clear_database().await.unwrap();
        assert_eq!(cleared.deleted_count as usize, loaded);
        assert_eq!(ops.get_passenger_stats().await.unwrap().total_passengers, 0);
    }

    #[tokio::test]
    async fn import_generates_missing_flight_numbers_per_call() {
        let ops = ops().await;
        let csv = "header\n\
                   Ana,Silva,ana@example.com\n\
                   Ben,Ode,ben@example.com,,,,,,TP100\n\
                   Cai,Lo,cai@example.com\n";

        let result = ops.import_passengers_from_csv(csv).await.unwrap();
        assert_eq!(result.imported_count, 3);

        let list = ops.get_passengers(Default::default()).await.unwrap();
        let flights: Vec<Option<&str>> = list
            .passengers
            .iter()
            .map(|p| p.flight_number.as_deref())
            .collect();
        assert_eq!(flights, vec![Some("BR0001"), Some("TP100"), Some("BR0003")]);

        // A second import starts numbering from 1 again.
        ops.import_passengers_from_csv("header\nDee,Ray,dee@example.com\n")
            .await
            .unwrap();
        let again = ops
            .get_passengers(PassengerFilters {
                flight_number: Some("BR0001".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(again.total_count, 2);
    }

    #[tokio::test]
    async fn limit_and_filters_select_a_subset() {
        let ops = ops().await;
        ops.populate_test_data().await.unwrap();
        let all = ops.get_passengers(Default::default()).await.unwrap();

        let filters = PassengerFilters {
            ticket_class: Some("economy".to_string()),
            status: Some("confirmed".to_string()),
            limit: Some(3),
            ..Default::default()
        };
        let some = ops.get_passengers(filters).await.unwrap();

        assert!(some.passengers.len() <= 3);
        assert!(some.total_count >= some.passengers.len());
        for p in &some.passengers {
            assert_eq!(p.ticket_class.as_deref(), Some("economy"));
            assert_eq!(p.status, "confirmed");
            assert!(all.passengers.iter().any(|q| q.id == p.id));
        }
    }

    #[tokio::test]
    async fn zero_limit_means_everything() {
        let ops = ops().await;
        let loaded = ops.populate_test_data().await.unwrap().imported_count;
        let list = ops
            .get_passengers(PassengerFilters {
                limit: Some(0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(list.passengers.len(), loaded);
        assert_eq!(list.total_count, loaded);
    }

    #[tokio::test]
    async fn failed_insert_stops_import_and_keeps_earlier_rows() {
        let pool = connect("sqlite::memory:").await.expect("in-memory store");
        sqlx::query(
            "CREATE TRIGGER reject_bad BEFORE INSERT ON passengers \
             WHEN NEW.first_name = 'Bad' BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        )
        .execute(&pool)
        .await
        .expect("create trigger");
        let ops = PassengerOps::new(PassengerStore::new(pool));

        let csv = "header\n\
                   Ana,Silva,ana@example.com\n\
                   Bad,Row,bad@example.com\n\
                   Cai,Lo,cai@example.com\n";
        let err = ops.import_passengers_from_csv(csv).await;
        assert!(matches!(err, Err(DeskError::DatabaseError(_))));

        let list = ops.get_passengers(Default::default()).await.unwrap();
        assert_eq!(list.total_count, 1);
        assert_eq!(list.passengers[0].first_name, "Ana");
    }
}
