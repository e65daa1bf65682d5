use crate::db::DbPassenger;
use crate::types::tools::PassengerStats;
use std::collections::BTreeMap;

const UNKNOWN_KEY: &str = "unknown";

#[derive(Debug, Default)]
struct StatsAccumulator {
    total: usize,
    by_ticket_class: BTreeMap<String, u64>,
    by_status: BTreeMap<String, u64>,
    by_flight: BTreeMap<String, u64>,
    price_sum: f64,
    price_count: u64,
}

impl StatsAccumulator {
    fn observe(&mut self, p: &DbPassenger) {
        self.total += 1;
        bump(&mut self.by_ticket_class, p.ticket_class.as_deref());
        bump(&mut self.by_status, Some(p.status.as_str()));
        bump(&mut self.by_flight, p.flight_number.as_deref());

        if let Some(price) = p.price.as_deref().and_then(parse_price) {
            self.price_sum += price;
            self.price_count += 1;
        }
    }

    fn finish(self) -> PassengerStats {
        let average_price = if self.price_count == 0 {
            0.0
        } else {
            round_cents(self.price_sum / self.price_count as f64)
        };
        let message = if self.total == 0 {
            "No passengers on record".to_string()
        } else {
            format!(
                "{} passengers across {} flights, average price {:.2}",
                self.total,
                self.by_flight.len(),
                average_price
            )
        };
        PassengerStats {
            total_passengers: self.total,
            by_ticket_class: self.by_ticket_class,
            by_status: self.by_status,
            by_flight: self.by_flight,
            average_price,
            message,
        }
    }
}

fn bump(table: &mut BTreeMap<String, u64>, key: Option<&str>) {
    let key = key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or(UNKNOWN_KEY);
    *table.entry(key.to_string()).or_insert(0) += 1;
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Single pass over `passengers`.
pub fn summarize<'a>(passengers: impl IntoIterator<Item = &'a DbPassenger>) -> PassengerStats {
    let mut acc = StatsAccumulator::default();
    for p in passengers {
        acc.observe(p);
    }
    acc.finish()
}
