//! Layout command handlers.

use std::path::Path;

use anyhow::Context;
use blusb::codec;
use blusb_keyboard::{Layout, COLS};

use super::{with_keyboard, CommandResult, DeviceOptions};

/// Print the controller's layout in the file format
pub fn read(opts: &DeviceOptions) -> CommandResult {
    with_keyboard(opts, |kb| {
        let layout = kb.read_layout().context("Reading the layout")?;
        print!("{}", codec::serialize_layout(&layout));
        Ok(())
    })
}

/// Print the controller's layout as one table per layer
pub fn print(opts: &DeviceOptions) -> CommandResult {
    with_keyboard(opts, |kb| {
        let layout = kb.read_layout().context("Reading the layout")?;
        print!("{}", format_table(&layout));
        Ok(())
    })
}

pub fn write(opts: &DeviceOptions, file: &Path) -> CommandResult {
    let layout = codec::load_layout(file)?;
    with_keyboard(opts, |kb| {
        kb.write_layout(&layout).context("Writing the layout")?;
        println!(
            "Wrote {} layer(s) from {} to the controller",
            layout.layer_count(),
            file.display()
        );
        Ok(())
    })
}

/// Parse a layout file and report what it holds
pub fn check(file: &Path) -> CommandResult {
    let layout = codec::load_layout(file)?;
    println!("{}: {} layer(s), OK", file.display(), layout.layer_count());
    Ok(())
}

/// One block per layer: matrix columns across, matrix rows down, numeric
/// codes in the cells
pub fn format_table(layout: &Layout) -> String {
    let mut out = String::new();
    for (index, layer) in layout.layers().enumerate() {
        out.push_str(&format!("Layer {}\n", index + 1));

        let mut header = String::from("    ");
        for col in 0..COLS {
            header.push_str(&format!("C{:<5}", col + 1));
        }
        push_line(&mut out, &header);

        for (row, codes) in layer.chunks(COLS).enumerate() {
            let mut line = format!("R{}  ", row + 1);
            for code in codes {
                line.push_str(&format!("{:<6}", code.value()));
            }
            push_line(&mut out, &line);
        }
        out.push('\n');
    }
    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use blusb_keyboard::{Cell, KeyCode, ROWS};

    #[test]
    fn test_table_shape() {
        let mut layout = Layout::new(2).unwrap();
        layout.set(Cell::new(1, 0, 7), KeyCode(0x0302)).unwrap();
        layout.set(Cell::new(0, ROWS - 1, 0), KeyCode(0x29)).unwrap();
        let table = format_table(&layout);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Layer 1");
        assert_eq!(
            lines[1],
            "    C1    C2    C3    C4    C5    C6    C7    C8"
        );
        assert_eq!(lines[2], "R1  0     0     0     0     0     0     0     0");
        assert_eq!(lines[1 + ROWS], "R20  41    0     0     0     0     0     0     0");
        assert_eq!(lines.iter().filter(|l| l.starts_with("Layer")).count(), 2);
        // layer 2, row 1 ends with column 8
        let layer2 = lines.iter().position(|l| *l == "Layer 2").unwrap();
        assert_eq!(
            lines[layer2 + 2],
            "R1  0     0     0     0     0     0     0     770"
        );
        assert_eq!(lines.len(), 2 * (ROWS + 3));
    }
}
