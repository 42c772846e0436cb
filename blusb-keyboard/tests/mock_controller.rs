//! Keyboard API against the in-memory controller.

use blusb_keyboard::{
    Cell, Debounce, KeyCode, Keyboard, KeyboardError, Layout, MacroTable, MatrixPos,
    MatrixScanner, Pwm, LEN_MACRO,
};
use blusb_transport::protocol::cmd;
use blusb_transport::{MockTransport, TransportError};

fn keyboard() -> (MockTransport, Keyboard) {
    let mock = MockTransport::new();
    let kb = Keyboard::with_transport(Box::new(mock.clone()));
    (mock, kb)
}

#[test]
fn default_controller_has_one_blank_layer() {
    let (_, kb) = keyboard();
    let layout = kb.read_layout().unwrap();
    assert_eq!(layout, Layout::new(1).unwrap());
}

#[test]
fn layout_written_is_read_back() {
    let (mock, kb) = keyboard();
    let mut layout = Layout::new(4).unwrap();
    layout.set(Cell::new(3, 12, 5), KeyCode(0x2C)).unwrap();
    layout.set(Cell::new(0, 0, 0), KeyCode(0x29)).unwrap();

    kb.write_layout(&layout).unwrap();
    assert_eq!(kb.read_layout().unwrap(), layout);
    assert_eq!(mock.with(|s| s.layout[0]), 4);
}

#[test]
fn layout_write_uses_single_count_byte() {
    let (mock, kb) = keyboard();
    let mut layout = Layout::new(2).unwrap();
    layout.set(Cell::new(0, 0, 0), KeyCode(0x0104)).unwrap();
    kb.write_layout(&layout).unwrap();

    let sent = mock.with(|s| {
        s.requests
            .iter()
            .rev()
            .find(|(op, _)| *op == cmd::WRITE_LAYOUT)
            .map(|(_, payload)| payload.clone())
    });
    let sent = sent.expect("no WRITE_LAYOUT request");
    assert_eq!(sent.len(), 1 + 2 * 2 * 160);
    assert_eq!(&sent[..3], &[2, 0x04, 0x01]);
}

#[test]
fn corrupt_layer_count_is_rejected() {
    let (mock, kb) = keyboard();
    mock.with(|s| s.layout[0] = 9);
    assert!(matches!(
        kb.read_layout(),
        Err(KeyboardError::BadLayerCount(9))
    ));
}

#[test]
fn settings_round_trip() {
    let (_, kb) = keyboard();
    kb.write_pwm(Pwm::new(10, 20)).unwrap();
    assert_eq!(kb.read_pwm().unwrap(), Pwm::new(10, 20));

    kb.write_debounce(Debounce::new(12).unwrap()).unwrap();
    assert_eq!(kb.read_debounce().unwrap().ms(), 12);

    let version = kb.read_version().unwrap();
    assert_eq!(version.to_string(), "1.5");
}

#[test]
fn macros_round_trip() {
    let (_, kb) = keyboard();
    let mut table = MacroTable::new();
    let sequence = [0x01, 0, 0x06, 0, 0, 0, 0, 0].map(KeyCode);
    table.set(3, sequence).unwrap();
    kb.write_macros(&table).unwrap();

    let read = kb.read_macros().unwrap();
    assert_eq!(read.count(), 24);
    assert_eq!(read.get(3), table.get(3));
    assert_eq!(read.get(0), Some(&[KeyCode(0); LEN_MACRO]));
}

#[test]
fn erased_macro_storage_is_an_error() {
    let (mock, kb) = keyboard();
    mock.with(|s| s.macros = vec![0xFF; 192]);
    assert!(matches!(kb.read_macros(), Err(KeyboardError::BadEeprom)));
}

#[test]
fn scanner_reports_new_positions_in_service_mode() {
    let (mock, kb) = keyboard();
    let guard = kb.service_mode().unwrap();
    mock.with(|s| {
        s.push_key(1, 2);
        s.push_key(1, 2);
        s.push_key(7, 0);
    });

    let mut scanner = MatrixScanner::new();
    let mut seen = Vec::new();
    for _ in 0..4 {
        if let Some(pos) = scanner.poll(&kb).unwrap() {
            seen.push(pos);
        }
    }
    drop(guard);

    assert_eq!(
        seen,
        vec![MatrixPos { row: 1, col: 2 }, MatrixPos { row: 7, col: 0 }]
    );
    assert!(!mock.with(|s| s.service_mode));
    assert_eq!(
        mock.with(|s| s.opcodes().last().copied()),
        Some(cmd::DISABLE_SERVICE_MODE)
    );
}

#[test]
fn entering_service_mode_drains_stale_positions() {
    let (mock, kb) = keyboard();
    mock.with(|s| {
        s.service_mode = true;
        s.push_key(4, 4);
        s.push_key(5, 0);
        s.push_key(6, 6);
    });

    kb.enter_service_mode().unwrap();
    // stops at the first report with a zero coordinate
    assert_eq!(mock.with(|s| s.scan_queue.len()), 1);
    assert!(mock.with(|s| s.service_mode));
}

#[test]
fn disconnected_device_surfaces_transport_error() {
    let (mock, kb) = keyboard();
    mock.with(|s| s.disconnected = true);
    assert!(matches!(
        kb.read_version(),
        Err(KeyboardError::Transport(TransportError::Disconnected))
    ));
}
