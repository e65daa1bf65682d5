use crate::db::{DbPassenger, DbTodo};
use crate::types::tools::{PassengerList, PassengerStats, UserProfile};
use std::collections::BTreeMap;
use std::fmt::Write;

pub fn render_user(user: &UserProfile) -> String {
    format!("{} <{}> (id {})", user.name, user.email, user.id)
}

pub fn render_todos(todos: &[DbTodo]) -> String {
    if todos.is_empty() {
        return "No todos yet.".to_string();
    }
    let mut out = String::new();
    for todo in todos {
        let mark = if todo.completed { 'x' } else { ' ' };
        let title = todo.title.as_deref().unwrap_or("(untitled)");
        let _ = writeln!(out, "[{mark}] #{:<4} {title}", todo.id);
    }
    out
}

const PASSENGER_HEADERS: [&str; 7] = ["ID", "NAME", "FLIGHT", "ROUTE", "CLASS", "PRICE", "STATUS"];

fn passenger_cells(p: &DbPassenger) -> [String; 7] {
    let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    [
        p.id.to_string(),
        format!("{} {}", p.first_name, p.last_name),
        dash(&p.flight_number),
        format!("{} -> {}", dash(&p.departure_city), dash(&p.arrival_city)),
        dash(&p.ticket_class),
        dash(&p.price),
        p.status.clone(),
    ]
}

/// Column-aligned table followed by the server's summary line.
pub fn render_passengers(list: &PassengerList) -> String {
    let rows: Vec<[String; 7]> = list.passengers.iter().map(passenger_cells).collect();
    let mut widths = PASSENGER_HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut line = |cells: &[&str]| {
        let joined: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect();
        let _ = writeln!(out, "{}", joined.join("  ").trim_end());
    };
    line(&PASSENGER_HEADERS);
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        line(&cells);
    }
    let _ = writeln!(out, "{}", list.message);
    out
}

fn render_card(out: &mut String, title: &str, table: &BTreeMap<String, u64>) {
    let _ = writeln!(out, "{title}");
    if table.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    let width = table.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (key, count) in table {
        let _ = writeln!(out, "  {key:<width$}  {count}");
    }
}

/// Stat cards: headline numbers then one card per grouping.
pub fn render_stats(stats: &PassengerStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Passengers     {}", stats.total_passengers);
    let _ = writeln!(out, "Average price  {:.2}", stats.average_price);
    render_card(&mut out, "By ticket class", &stats.by_ticket_class);
    render_card(&mut out, "By status", &stats.by_status);
    render_card(&mut out, "By flight", &stats.by_flight);
    let _ = writeln!(out, "{}", stats.message);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todos_show_completion_marks() {
        let todos = vec![
            DbTodo {
                id: 1,
                title: Some("Check manifest".into()),
                completed: true,
            },
            DbTodo {
                id: 2,
                title: None,
                completed: false,
            },
        ];
        let text = render_todos(&todos);
        assert!(text.contains("[x] #1"));
        assert!(text.contains("[ ] #2"));
        assert!(text.contains("(untitled)"));
        assert_eq!(render_todos(&[]), "No todos yet.");
    }

    #[test]
    fn stats_cards_list_every_bucket() {
        let mut by_status = BTreeMap::new();
        by_status.insert("confirmed".to_string(), 3);
        by_status.insert("cancelled".to_string(), 1);
        let stats = PassengerStats {
            total_passengers: 4,
            by_ticket_class: BTreeMap::new(),
            by_status,
            by_flight: BTreeMap::new(),
            average_price: 12.5,
            message: "4 passengers".into(),
        };
        let text = render_stats(&stats);
        assert!(text.contains("Average price  12.50"));
        assert!(text.contains("confirmed  3"));
        assert!(text.contains("(none)"));
    }

    #[test]
    fn empty_passenger_table_keeps_header_and_message() {
        let list = PassengerList {
            passengers: vec![],
            total_count: 0,
            message: "Found 0 passengers (no filters)".into(),
        };
        let text = render_passengers(&list);
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("ID  NAME"));
        assert_eq!(lines.next(), Some("Found 0 passengers (no filters)"));
    }
}
