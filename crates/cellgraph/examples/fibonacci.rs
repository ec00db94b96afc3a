//! Example: build a Fibonacci column and watch it recalculate

use cellgraph::prelude::*;

fn main() -> Result<()> {
    let mut sheet = Spreadsheet::new();

    sheet.set_cell_value("A1", 0)?;
    sheet.set_cell_value("A2", 1)?;
    for row in 3..=20 {
        let formula = format!("=A{}+A{}", row - 2, row - 1);
        sheet.set_cell_value(&format!("A{}", row), formula)?;
    }
    println!("A20 = {}", sheet.get_cell_value("A20")?);

    // Reseed the sequence; every dependent cell is recomputed
    sheet.set_cell_value("A2", 2)?;
    println!("A20 = {} after A2 = 2", sheet.get_cell_value("A20")?);

    // Closing a loop is rejected and leaves the sheet unchanged
    if let Err(err) = sheet.set_cell_value("A1", "=A20") {
        println!("rejected: {}", err);
    }
    println!("A1 = {}", sheet.get_cell_value("A1")?);

    Ok(())
}
