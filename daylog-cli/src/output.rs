//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use daylog_core::DiaryEntry;
use rust_decimal::Decimal;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Weight for display, "-" when unset
pub fn format_weight(weight: Option<Decimal>) -> String {
    weight
        .map(|w| w.normalize().to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Print a single entry: weight, then nutrition against goals
pub fn print_entry(entry: &DiaryEntry) {
    println!("{}", format!("Diary for {}", entry.date).bold());
    println!("  Weight: {}", format_weight(entry.weight));
    println!();

    if entry.nutrition.is_empty() && entry.goals.is_empty() {
        println!("{}", "Nothing logged yet".dimmed());
    } else {
        let mut table = create_table();
        table.set_header(vec!["Item", "Logged", "Goal"]);

        for (item, amount) in &entry.nutrition {
            let goal = entry
                .goals
                .get(item)
                .map(|g| g.normalize().to_string())
                .unwrap_or_default();
            table.add_row(vec![item.clone(), amount.normalize().to_string(), goal]);
        }
        for (name, target) in &entry.goals.targets {
            if !entry.nutrition.contains_key(name) {
                table.add_row(vec![name.clone(), String::new(), target.normalize().to_string()]);
            }
        }

        println!("{}", table);
    }

    if !entry.extra.is_empty() {
        println!();
        for (key, value) in &entry.extra {
            println!("  {}: {}", key, value);
        }
    }
}
