// Integration tests for the Markdown pin tables

use firmata_table::pintable::{Board, Header, MarkdownRenderer, Pin, PinMode, RenderError};

fn named(pin: usize) -> Option<String> {
    Some(format!("D{}", pin))
}

/// Two 10-slot headers with two pads each over a 16-pin array.
fn pair_board() -> Board {
    Board {
        name: "pair".to_string(),
        headers: vec![
            Header::new("LEFT", 10, 0).with_padding([(1, "5V"), (6, "GND")]),
            Header::new("RIGHT", 10, 8).with_padding([(9, "3V3"), (10, "GND")]),
        ],
        analog_pins: vec![2, 10],
        pin_end: 16,
    }
}

fn pins(count: usize) -> Vec<Pin> {
    (0..count)
        .map(|i| {
            let mut pin = Pin::new(PinMode::Input, [PinMode::Pullup, PinMode::Input, PinMode::Output]);
            pin.value = i as u32 * 10;
            pin
        })
        .collect()
}

/// Digital ids printed in a table, in slot order. Left cells carry the id in
/// column 6, right cells in column 10 (1-based, after the leading pipe).
fn digital_ids(table: &str) -> Vec<usize> {
    let mut ids = Vec::new();
    for row in table.lines().skip(2).filter(|l| !l.is_empty()) {
        let cells: Vec<&str> = row.split('|').map(str::trim).collect();
        for cell in [cells[6], cells[10]] {
            if let Ok(id) = cell.parse() {
                ids.push(id);
            }
        }
    }
    ids
}

#[test]
fn test_two_header_board_renders_two_tables_of_five_rows() {
    let board = pair_board();
    let renderer = MarkdownRenderer::new(&board, &named);
    let tables = renderer.render_all(&pins(16)).unwrap();
    assert_eq!(tables.len(), 2);
    for (table, header) in tables.iter().zip(&board.headers) {
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2 + header.total.div_ceil(2) + 1);
        assert_eq!(lines.last(), Some(&""));
        assert!(table.ends_with("|\n\n"));
    }
    assert_eq!(digital_ids(&tables[0]), (0..8).collect::<Vec<_>>());
    assert_eq!(digital_ids(&tables[1]), (8..16).collect::<Vec<_>>());
}

#[test]
fn test_padding_rows_carry_only_slot_and_label() {
    let board = pair_board();
    let renderer = MarkdownRenderer::new(&board, &named);
    let tables = renderer.render_all(&pins(16)).unwrap();
    let left: Vec<&str> = tables[0].lines().collect();
    // Slot 1 is padding on the left half, slot 6 on the right half.
    assert!(left[2].starts_with("| | | | | | | 5V | 1 2 | D0 |"));
    assert!(left[4].ends_with("| 5 6 | GND | | | | | | |"));
    let right: Vec<&str> = tables[1].lines().collect();
    assert_eq!(right[6], "| | | | | | | 3V3 | 9 10 | GND | | | | | | |");
}

#[test]
fn test_rendering_is_idempotent() {
    let board = pair_board();
    let renderer = MarkdownRenderer::new(&board, &named);
    let pins = pins(16);
    assert_eq!(renderer.render_all(&pins).unwrap(), renderer.render_all(&pins).unwrap());
}

#[test]
fn test_mode_order_does_not_depend_on_report_order() {
    let board = pair_board();
    let renderer = MarkdownRenderer::new(&board, &named);
    let mut shuffled = pins(16);
    for pin in &mut shuffled {
        pin.modes.reverse();
    }
    assert_eq!(renderer.render_all(&pins(16)).unwrap(), renderer.render_all(&shuffled).unwrap());
    assert!(renderer.render_all(&shuffled).unwrap()[0].contains("[I O PULLUP]"));
}

#[test]
fn test_analog_channel_comes_from_board_list() {
    let board = pair_board();
    let renderer = MarkdownRenderer::new(&board, &named);
    let mut pins = pins(16);
    pins[10].analog_channel = 42;
    pins[4].analog_channel = 7;
    let tables = renderer.render_all(&pins).unwrap();
    // Pin 10 is analog_pins[1]; the stored 42 is ignored.
    assert!(tables[1].contains("| 1 | [I O PULLUP] | I | 0 | 100 | 10 | D10 | 3 "));
    // Pin 4 is not listed, so its own channel is shown.
    assert!(tables[0].contains("| 7 | [I O PULLUP] | I | 0 | 40 | 4 | D4 |"));
}

#[test]
fn test_short_pin_array_is_an_error() {
    let board = pair_board();
    let renderer = MarkdownRenderer::new(&board, &named);
    let err = renderer.render_all(&pins(12)).unwrap_err();
    match err {
        RenderError::PinOutOfRange { header, pin, available, .. } => {
            assert_eq!(header, "RIGHT");
            assert_eq!(pin, 12);
            assert_eq!(available, 12);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_odd_header_stops_render_all() {
    let mut board = pair_board();
    board.headers.insert(1, Header::new("ODD", 5, 0));
    let renderer = MarkdownRenderer::new(&board, &named);
    assert!(matches!(renderer.render_all(&pins(16)), Err(RenderError::Layout(_))));
}
