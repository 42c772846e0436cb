//! Key layout model and the controller's binary layout buffer
//!
//! A layout holds up to [`MAX_LAYERS`] planes of [`ROWS`] x [`COLS`] key
//! codes. Storage is one flat array sized for the maximum layer count, so
//! shrinking and regrowing the layer count keeps the data of hidden layers.

use std::fmt;

use crate::error::KeyboardError;

pub use blusb_transport::protocol::geometry::{COLS, KEYS_PER_LAYER, MAX_LAYERS, ROWS};

/// Action assigned to a matrix cell: a HID usage, a macro slot or a
/// layer action. Zero means unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const NONE: KeyCode = KeyCode(0);

    pub fn value(self) -> u16 {
        self.0
    }
}

impl From<u16> for KeyCode {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address of one cell in a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub layer: usize,
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(layer: usize, row: usize, col: usize) -> Self {
        Self { layer, row, col }
    }
}

/// Per-layer key assignments for the whole board
#[derive(Clone)]
pub struct Layout {
    layer_count: usize,
    cells: Box<[KeyCode]>,
}

impl Layout {
    /// All cells unassigned
    pub fn new(layer_count: usize) -> Result<Self, KeyboardError> {
        check_layer_count(layer_count)?;
        Ok(Self {
            layer_count,
            cells: vec![KeyCode::NONE; MAX_LAYERS * KEYS_PER_LAYER].into_boxed_slice(),
        })
    }

    /// Build from complete layers in layer, row, column order
    pub fn from_layers(layers: &[[KeyCode; KEYS_PER_LAYER]]) -> Result<Self, KeyboardError> {
        let mut layout = Self::new(layers.len())?;
        for (n, layer) in layers.iter().enumerate() {
            let start = n * KEYS_PER_LAYER;
            layout.cells[start..start + KEYS_PER_LAYER].copy_from_slice(layer);
        }
        Ok(layout)
    }

    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    /// Change the number of active layers (1..=MAX_LAYERS)
    pub fn set_layer_count(&mut self, layer_count: usize) -> Result<(), KeyboardError> {
        check_layer_count(layer_count)?;
        self.layer_count = layer_count;
        Ok(())
    }

    fn offset(&self, cell: Cell) -> Option<usize> {
        (cell.layer < self.layer_count && cell.row < ROWS && cell.col < COLS)
            .then(|| cell.layer * KEYS_PER_LAYER + cell.row * COLS + cell.col)
    }

    /// Key code at `cell`, `None` outside the active layers
    pub fn get(&self, cell: Cell) -> Option<KeyCode> {
        self.offset(cell).map(|i| self.cells[i])
    }

    pub fn set(&mut self, cell: Cell, code: KeyCode) -> Result<(), KeyboardError> {
        let i = self.offset(cell).ok_or_else(|| {
            KeyboardError::InvalidParameter(format!(
                "cell {}/{}/{} outside layout with {} layers",
                cell.layer, cell.row, cell.col, self.layer_count
            ))
        })?;
        self.cells[i] = code;
        Ok(())
    }

    /// One layer in row, column order
    pub fn layer(&self, layer: usize) -> Option<&[KeyCode]> {
        (layer < self.layer_count)
            .then(|| &self.cells[layer * KEYS_PER_LAYER..(layer + 1) * KEYS_PER_LAYER])
    }

    /// Active layers in order
    pub fn layers(&self) -> impl Iterator<Item = &[KeyCode]> {
        self.cells[..self.layer_count * KEYS_PER_LAYER].chunks(KEYS_PER_LAYER)
    }

    /// Encode in the READ_LAYOUT image: u16 LE layer count, then every
    /// active cell as u16 LE in layer, row, column order.
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(2 + 2 * self.layer_count * KEYS_PER_LAYER);
        buf.extend_from_slice(&(self.layer_count as u16).to_le_bytes());
        for code in &self.cells[..self.layer_count * KEYS_PER_LAYER] {
            buf.extend_from_slice(&code.0.to_le_bytes());
        }
        buf
    }

    /// Encode for WRITE_LAYOUT. The firmware takes a single count byte
    /// here, so the cells start at offset 1 instead of 2.
    pub fn pack_write(&self) -> Vec<u8> {
        let image = self.pack();
        let mut buf = Vec::with_capacity(image.len() - 1);
        buf.push(self.layer_count as u8);
        buf.extend_from_slice(&image[2..]);
        buf
    }

    /// Decode a READ_LAYOUT reply. The layer count is validated before any
    /// cell is read; trailing bytes past the active layers are ignored.
    pub fn unpack(buf: &[u8]) -> Result<Self, KeyboardError> {
        if buf.len() < 2 {
            return Err(KeyboardError::ShortBuffer {
                expected: 2,
                actual: buf.len(),
            });
        }
        let layer_count = u16::from_le_bytes([buf[0], buf[1]]) as usize;
        if layer_count == 0 {
            return Err(KeyboardError::NoLayers);
        }
        if layer_count > MAX_LAYERS {
            return Err(KeyboardError::BadLayerCount(layer_count));
        }

        let expected = 2 + 2 * layer_count * KEYS_PER_LAYER;
        if buf.len() < expected {
            return Err(KeyboardError::ShortBuffer {
                expected,
                actual: buf.len(),
            });
        }

        let mut layout = Self::new(layer_count)?;
        for (cell, bytes) in layout.cells.iter_mut().zip(buf[2..expected].chunks_exact(2)) {
            *cell = KeyCode(u16::from_le_bytes([bytes[0], bytes[1]]));
        }
        Ok(layout)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            layer_count: 1,
            cells: vec![KeyCode::NONE; MAX_LAYERS * KEYS_PER_LAYER].into_boxed_slice(),
        }
    }
}

// Hidden layers do not take part in equality.
impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        self.layer_count == other.layer_count && self.layers().eq(other.layers())
    }
}

impl Eq for Layout {}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("layer_count", &self.layer_count)
            .finish_non_exhaustive()
    }
}

fn check_layer_count(layer_count: usize) -> Result<(), KeyboardError> {
    if (1..=MAX_LAYERS).contains(&layer_count) {
        Ok(())
    } else {
        Err(KeyboardError::InvalidParameter(format!(
            "layer count must be between 1 and {MAX_LAYERS}, got {layer_count}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blusb_transport::protocol::sizes;
    use proptest::prelude::*;

    #[test]
    fn test_new_layout_is_blank() {
        let layout = Layout::new(3).unwrap();
        assert_eq!(layout.layer_count(), 3);
        assert!(layout.layers().flatten().all(|c| *c == KeyCode::NONE));
        assert!(Layout::new(0).is_err());
        assert!(Layout::new(7).is_err());
    }

    #[test]
    fn test_cell_bounds() {
        let mut layout = Layout::new(2).unwrap();
        layout.set(Cell::new(1, 19, 7), KeyCode(0x29)).unwrap();
        assert_eq!(layout.get(Cell::new(1, 19, 7)), Some(KeyCode(0x29)));
        assert_eq!(layout.get(Cell::new(2, 0, 0)), None);
        assert_eq!(layout.get(Cell::new(0, ROWS, 0)), None);
        assert!(layout.set(Cell::new(0, 0, COLS), KeyCode(1)).is_err());
    }

    #[test]
    fn test_hidden_layers_survive_shrink() {
        let mut layout = Layout::new(3).unwrap();
        layout.set(Cell::new(2, 4, 4), KeyCode(7)).unwrap();
        layout.set_layer_count(1).unwrap();
        assert_eq!(layout.get(Cell::new(2, 4, 4)), None);
        assert_eq!(layout, Layout::new(1).unwrap());
        layout.set_layer_count(3).unwrap();
        assert_eq!(layout.get(Cell::new(2, 4, 4)), Some(KeyCode(7)));
    }

    #[test]
    fn test_pack_layout() {
        let mut layout = Layout::new(1).unwrap();
        layout.set(Cell::new(0, 0, 1), KeyCode(0x1234)).unwrap();
        let buf = layout.pack();
        assert_eq!(buf.len(), 2 + 2 * KEYS_PER_LAYER);
        assert_eq!(&buf[..6], &[1, 0, 0, 0, 0x34, 0x12]);
    }

    #[test]
    fn test_pack_write_layout() {
        let mut layout = Layout::new(2).unwrap();
        layout.set(Cell::new(0, 0, 1), KeyCode(0x1234)).unwrap();
        layout.set(Cell::new(1, ROWS - 1, COLS - 1), KeyCode(0x00E0)).unwrap();
        let buf = layout.pack_write();
        assert_eq!(buf.len(), 1 + 2 * 2 * KEYS_PER_LAYER);
        assert_eq!(&buf[..5], &[2, 0, 0, 0x34, 0x12]);
        assert_eq!(&buf[buf.len() - 2..], &[0xE0, 0x00]);
        assert_eq!(&buf[1..], &layout.pack()[2..]);
    }

    #[test]
    fn test_unpack_full_reply() {
        // the controller always answers with the maximum buffer size
        let mut buf = vec![0u8; sizes::LAYOUT_BUFFER];
        buf[0] = 2;
        let last = 2 + 2 * (2 * KEYS_PER_LAYER - 1);
        buf[last] = 0xE0;
        let layout = Layout::unpack(&buf).unwrap();
        assert_eq!(layout.layer_count(), 2);
        assert_eq!(layout.get(Cell::new(1, ROWS - 1, COLS - 1)), Some(KeyCode(0xE0)));
    }

    #[test]
    fn test_unpack_rejects_bad_counts() {
        let mut buf = vec![0u8; sizes::LAYOUT_BUFFER];
        assert!(matches!(Layout::unpack(&buf), Err(KeyboardError::NoLayers)));
        buf[0] = 0xFF;
        assert!(matches!(
            Layout::unpack(&buf),
            Err(KeyboardError::BadLayerCount(255))
        ));
        assert!(matches!(
            Layout::unpack(&[3, 0, 1, 2]),
            Err(KeyboardError::ShortBuffer { .. })
        ));
    }

    fn arb_layout() -> impl Strategy<Value = Layout> {
        (1..=MAX_LAYERS).prop_flat_map(|n| {
            proptest::collection::vec(any::<u16>(), n * KEYS_PER_LAYER).prop_map(move |values| {
                let mut layout = Layout::new(n).unwrap();
                for (i, v) in values.into_iter().enumerate() {
                    let cell = Cell::new(i / KEYS_PER_LAYER, (i / COLS) % ROWS, i % COLS);
                    layout.set(cell, KeyCode(v)).unwrap();
                }
                layout
            })
        })
    }

    proptest! {
        #[test]
        fn prop_binary_round_trip(layout in arb_layout()) {
            prop_assert_eq!(Layout::unpack(&layout.pack()).unwrap(), layout);
        }
    }
}
