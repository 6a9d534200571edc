//! Command adapter tests.
//!
//! Run with: cargo test --test input_test

use wx_dashboard::input::{AdminCommand, Input, InputError, parse_line};
use wx_dashboard::sync::Command;
use wx_dashboard::view::{Intent, PanelId, Section};

fn intent(line: &str) -> Intent {
    match parse_line(line) {
        Ok(Input::Dashboard(Command::Intent(intent))) => intent,
        other => panic!("expected intent from {line:?}, got {other:?}"),
    }
}

#[test]
fn view_intents() {
    assert_eq!(intent("station kalmillp10"), Intent::SelectStation("kalmillp10".to_string()));
    assert_eq!(intent("hours 48"), Intent::SelectRelativeWindow(48));
    assert_eq!(intent("unit"), Intent::ToggleUnit);
    assert_eq!(intent("panel wind-direction"), Intent::TogglePanel(PanelId::WindDirection));
    assert_eq!(intent("section alerts"), Intent::ToggleSection(Section::Alerts));
    assert_eq!(intent("interval 60000"), Intent::SetRefreshInterval(60_000));
    assert_eq!(intent("scrub 37.5"), Intent::SetSliderPosition(37.5));

    let Intent::SelectAbsoluteWindow { start, end } =
        intent("range 2025-06-01T00:00:00Z 2025-06-02T00:00:00Z")
    else {
        panic!("expected absolute window");
    };
    assert!(start < end);
}

#[test]
fn chart_and_admin_commands() {
    assert_eq!(parse_line("zoom 2").unwrap(), Input::Dashboard(Command::Zoom(2.0)));
    assert_eq!(parse_line("reset").unwrap(), Input::Dashboard(Command::ResetZoom));
    assert_eq!(parse_line("refresh").unwrap(), Input::Dashboard(Command::Refresh));
    assert!(matches!(
        parse_line("pan humidity 2025-06-01T02:00:00Z 2025-06-01T01:00:00Z").unwrap(),
        Input::Dashboard(Command::PanOrZoom { panel: PanelId::Humidity, range }) if range.min < range.max
    ));
    assert_eq!(
        parse_line("add kbay2 Bay Shore").unwrap(),
        Input::Admin(AdminCommand::AddStation {
            id: "KBAY2".to_string(),
            name: "Bay Shore".to_string()
        })
    );
    assert_eq!(parse_line("whoami").unwrap(), Input::Admin(AdminCommand::WhoAmI));
}

#[test]
fn bad_input() {
    assert_eq!(parse_line("   "), Err(InputError::Empty));
    assert_eq!(parse_line("fly away"), Err(InputError::Unknown("fly".to_string())));
    assert!(matches!(parse_line("hours many"), Err(InputError::Invalid { command: "hours", .. })));
    assert!(matches!(parse_line("panel radar"), Err(InputError::Invalid { .. })));
    assert!(matches!(parse_line("range 2025-06-01T00:00:00Z"), Err(InputError::Invalid { .. })));
    assert!(matches!(parse_line("add KX"), Err(InputError::Invalid { command: "add", .. })));
}
