use crate::db::log::{LogRow, load_log};
use crate::errors::AppResult;
use ansi_term::Colour;
use rusqlite::Connection;

/// Operation names are shown at most this wide.
const OP_MAX_WIDTH: usize = 40;

/// Colour per operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "in" | "add" | "import" => Colour::Green,
        "out" => Colour::Yellow,
        "del" | "clear" => Colour::Red,
        "journal" => Colour::Cyan,
        "switch" | "job" => Colour::Blue,
        "init" | "repair" | "dump" => Colour::Purple,
        _ => Colour::White,
    }
}

fn op_target(row: &LogRow) -> String {
    if row.target.is_empty() {
        row.operation.clone()
    } else {
        format!("{} ({})", row.operation, row.target)
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(conn: &Connection) -> AppResult<()> {
        let entries = load_log(conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|e| op_target(e).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_MAX_WIDTH);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);

        println!("📜 Internal log:\n");

        for e in &entries {
            let mut label = op_target(e);
            if label.chars().count() > op_w {
                label = label.chars().take(op_w.saturating_sub(3)).collect::<String>() + "...";
            }
            // pad before painting: ANSI codes would break the width
            let padded = format!("{:<op_w$}", label, op_w = op_w);
            println!(
                "{:>id_w$}: {} | {} => {}",
                e.id,
                e.date,
                color_for_operation(&e.operation).paint(padded),
                e.message,
                id_w = id_w
            );
        }

        Ok(())
    }
}
