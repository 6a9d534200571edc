//! Text commands from stdin, turned into dashboard commands.
//!
//! | Line | Effect |
//! |------|--------|
//! | `station ID` | switch station |
//! | `hours N` | relative window of N hours |
//! | `range START END` | absolute window, ISO-8601 instants |
//! | `unit` | toggle °F / °C |
//! | `panel ID`, `card ID`, `section NAME` | toggle visibility |
//! | `interval MS` | refresh cadence |
//! | `scrub PCT` | move the scrub control |
//! | `pan PANEL START END` | pan/zoom gesture on one panel |
//! | `zoom FACTOR`, `reset` | zoom around the centre, back to full span |
//! | `refresh` | run a cycle now |
//! | `export PATH` | CSV of the visible range |
//! | `stations`, `add ID NAME`, `remove ID`, `whoami` | station directory and account |

use crate::api::models::parse_instant;
use crate::chart::VisibleRange;
use crate::sync::Command;
use crate::view::{CardId, Intent, PanelId, Section};

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Dashboard(Command),
    Admin(AdminCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    ListStations,
    AddStation { id: String, name: String },
    RemoveStation(String),
    WhoAmI,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{command}: {reason}")]
    Invalid {
        command: &'static str,
        reason: String,
    },
}

/// Parse one line of input.
///
/// # Errors
///
/// Returns `InputError` for empty lines, unknown verbs, or bad arguments.
pub fn parse_line(line: &str) -> Result<Input, InputError> {
    let mut words = line.split_whitespace();
    let verb = words.next().ok_or(InputError::Empty)?;
    let args: Vec<&str> = words.collect();

    let intent = |intent: Intent| -> Result<Input, InputError> {
        Ok(Input::Dashboard(Command::Intent(intent)))
    };
    let command = |command: Command| -> Result<Input, InputError> { Ok(Input::Dashboard(command)) };

    match verb.to_lowercase().as_str() {
        "station" => intent(Intent::SelectStation(arg(&args, 0, "station")?.to_string())),
        "hours" => intent(Intent::SelectRelativeWindow(number(&args, 0, "hours")?)),
        "range" => {
            let start = instant(&args, 0, "range")?;
            let end = instant(&args, 1, "range")?;
            intent(Intent::SelectAbsoluteWindow { start, end })
        }
        "unit" => intent(Intent::ToggleUnit),
        "panel" => {
            let id = arg(&args, 0, "panel")?;
            let panel = PanelId::parse(id).ok_or_else(|| invalid("panel", id))?;
            intent(Intent::TogglePanel(panel))
        }
        "card" => {
            let id = arg(&args, 0, "card")?;
            let card = CardId::parse(id).ok_or_else(|| invalid("card", id))?;
            intent(Intent::ToggleCard(card))
        }
        "section" => {
            let section = match arg(&args, 0, "section")? {
                "nearby" => Section::Nearby,
                "daily" => Section::Daily,
                "alerts" => Section::Alerts,
                other => return Err(invalid("section", other)),
            };
            intent(Intent::ToggleSection(section))
        }
        "interval" => intent(Intent::SetRefreshInterval(number(&args, 0, "interval")?)),
        "scrub" => intent(Intent::SetSliderPosition(number(&args, 0, "scrub")?)),
        "pan" => {
            let id = arg(&args, 0, "pan")?;
            let panel = PanelId::parse(id).ok_or_else(|| invalid("pan", id))?;
            let range = VisibleRange::new(instant(&args, 1, "pan")?, instant(&args, 2, "pan")?);
            command(Command::PanOrZoom { panel, range })
        }
        "zoom" => command(Command::Zoom(number(&args, 0, "zoom")?)),
        "reset" => command(Command::ResetZoom),
        "refresh" => command(Command::Refresh),
        "export" => command(Command::Export(arg(&args, 0, "export")?.into())),
        "stations" => Ok(Input::Admin(AdminCommand::ListStations)),
        "add" => {
            let id = arg(&args, 0, "add")?.to_uppercase();
            let name = args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();
            if name.is_empty() {
                return Err(InputError::Invalid {
                    command: "add",
                    reason: "missing station name".to_string(),
                });
            }
            Ok(Input::Admin(AdminCommand::AddStation { id, name }))
        }
        "remove" => Ok(Input::Admin(AdminCommand::RemoveStation(
            arg(&args, 0, "remove")?.to_uppercase(),
        ))),
        "whoami" => Ok(Input::Admin(AdminCommand::WhoAmI)),
        _ => Err(InputError::Unknown(verb.to_string())),
    }
}

fn arg<'a>(args: &[&'a str], index: usize, command: &'static str) -> Result<&'a str, InputError> {
    args.get(index).copied().ok_or_else(|| InputError::Invalid {
        command,
        reason: format!("missing argument {}", index + 1),
    })
}

fn number<T: std::str::FromStr>(
    args: &[&str],
    index: usize,
    command: &'static str,
) -> Result<T, InputError> {
    let raw = arg(args, index, command)?;
    raw.parse().map_err(|_| invalid(command, raw))
}

fn instant(
    args: &[&str],
    index: usize,
    command: &'static str,
) -> Result<chrono::DateTime<chrono::Utc>, InputError> {
    let raw = arg(args, index, command)?;
    parse_instant(raw).ok_or_else(|| invalid(command, raw))
}

fn invalid(command: &'static str, value: &str) -> InputError {
    InputError::Invalid {
        command,
        reason: format!("invalid value '{value}'"),
    }
}
