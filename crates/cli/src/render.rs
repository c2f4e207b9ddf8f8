//! Terminal rendering of handle events.

use colored::Colorize;
use sk_protocol::ipc::Event;
use sk_protocol::log_models::LogLevel;
use sk_protocol::stage_models::StageMap;

/// What the renderer needs to know about the handle an event came from.
pub struct HandleView {
    pub name: String,
    pub current_stage: String,
}

/// Render one event as a single colored line.
pub fn render_event(event: &Event, view: &HandleView) -> String {
    match event {
        Event::LogAdded { message, level, .. } => {
            let tag = format!("[{level}]");
            let tag = match level {
                LogLevel::Trace | LogLevel::Debug => tag.as_str().dimmed(),
                LogLevel::Info => tag.as_str().blue(),
                LogLevel::Warning => tag.as_str().yellow(),
                LogLevel::Error => tag.as_str().red().bold(),
            };
            format!("{tag} {message}")
        }
        Event::Initialized { .. } => {
            format!("{} {}", "initialized".green().bold(), view.name)
        }
        Event::NameChanged { .. } => format!("{} {}", "name".bold(), view.name),
        Event::StageChanged { .. } => {
            format!("{} {}", "stage".bold(), view.current_stage.cyan())
        }
        Event::StateChanged { .. } => "state changed".dimmed().to_string(),
        Event::ActionStarted { action, .. } => {
            format!("{} {}", "started".cyan().bold(), action)
        }
        Event::ActionFinished {
            action, success, ..
        } => {
            if *success {
                format!("{} {}", "finished".green().bold(), action)
            } else {
                format!("{} {}", "failed".red().bold(), action)
            }
        }
    }
}

/// Render a stage map, one `STAGE yes|no` line per stage.
pub fn render_stage_map(map: &StageMap) -> String {
    map.iter()
        .map(|(stage, reached)| {
            let mark = if *reached { "yes".green() } else { "no".dimmed() };
            format!("  {stage:<16} {mark}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
