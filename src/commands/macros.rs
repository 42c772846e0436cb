//! Macro command handlers.

use std::path::Path;

use anyhow::Context;
use blusb::{codec, keymap};
use blusb_keyboard::{KeyCode, MacroTable, MACRO_FIELDS};

use super::{with_keyboard, CommandResult, DeviceOptions};

pub fn read(opts: &DeviceOptions) -> CommandResult {
    with_keyboard(opts, |kb| {
        let table = kb.read_macros().context("Reading the macros")?;
        print!("{}", codec::serialize_macros(&table));
        Ok(())
    })
}

pub fn print(opts: &DeviceOptions) -> CommandResult {
    with_keyboard(opts, |kb| {
        let table = kb.read_macros().context("Reading the macros")?;
        print!("{}", format_table(&table));
        Ok(())
    })
}

pub fn write(opts: &DeviceOptions, file: &Path) -> CommandResult {
    let table = codec::load_macros(file)?;
    with_keyboard(opts, |kb| {
        kb.write_macros(&table).context("Writing the macros")?;
        println!("Wrote {} macro(s) to the controller", table.count());
        Ok(())
    })
}

fn hex(code: KeyCode) -> String {
    format!("{:02X}", code.value())
}

/// Modifier and reserved bytes in hex, key slots by name
pub fn format_table(table: &MacroTable) -> String {
    if table.count() == 0 {
        return "No macros defined\n".to_string();
    }

    let mut header = format!("{:<6}", "Macro");
    for field in MACRO_FIELDS {
        header.push_str(&format!("{field:<6}"));
    }
    let mut out = String::new();
    push_line(&mut out, &header);

    for (i, sequence) in table.iter().enumerate() {
        let mut line = format!(
            "{:<6}{:<6}{:<6}",
            format!("M{}", i + 1),
            hex(sequence[0]),
            hex(sequence[1])
        );
        for code in &sequence[2..] {
            line.push_str(&format!("{:<6}", keymap::name_of(*code).unwrap_or("?")));
        }
        push_line(&mut out, &line);
    }
    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}
