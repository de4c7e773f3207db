//! List command implementation
//!
//! Prints every embedded registry item with its kind and description.

use console::Style;

use crate::error::Result;
use crate::registry::embedded;

/// Run list command
pub fn run() -> Result<()> {
    let names = embedded::list_names();
    if names.is_empty() {
        println!("No embedded items.");
        return Ok(());
    }

    println!("Embedded items ({}):", names.len());
    println!();
    for item in names.into_iter().filter_map(embedded::lookup) {
        println!(
            "  {} {}",
            Style::new().bold().yellow().apply_to(&item.name),
            Style::new().cyan().apply_to(format!("({})", item.kind))
        );
        if let Some(description) = &item.description {
            println!("    {}", Style::new().dim().apply_to(description));
        }
    }

    Ok(())
}
