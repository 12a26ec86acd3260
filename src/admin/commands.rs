use crate::admin::panels::Panel;

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Help,
    Switch(Panel),
    Refresh,
    Open(String),
    New,
    Edit(Option<String>),
    Delete(String),
    Publish(String),
    Public,
    ActivateTrait(String),
    Logout,
    Quit,
}

pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
}

pub fn all_commands() -> &'static [CommandSpec] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static CommandSpec> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        usage: "help",
        help: "Show available commands.",
    },
    CommandSpec {
        name: "tab",
        usage: "tab <panel>",
        help: "Switch panel and load it. Typing a panel name alone does the same.",
    },
    CommandSpec {
        name: "list",
        usage: "list",
        help: "Reload the current panel.",
    },
    CommandSpec {
        name: "open",
        usage: "open <id>",
        help: "Show the messages of one conversation.",
    },
    CommandSpec {
        name: "new",
        usage: "new",
        help: "Create a record in the current panel.",
    },
    CommandSpec {
        name: "edit",
        usage: "edit [id]",
        help: "Edit a record, or the settings and guidelines documents.",
    },
    CommandSpec {
        name: "delete",
        usage: "delete <id>",
        help: "Delete a record after confirmation.",
    },
    CommandSpec {
        name: "publish",
        usage: "publish <id>",
        help: "Toggle a reflection between published and draft.",
    },
    CommandSpec {
        name: "public",
        usage: "public",
        help: "Show the reflections visible to visitors.",
    },
    CommandSpec {
        name: "activate",
        usage: "activate <id>",
        help: "Mark a theamal entry as active.",
    },
    CommandSpec {
        name: "logout",
        usage: "logout",
        help: "End the admin session and leave the console.",
    },
    CommandSpec {
        name: "quit",
        usage: "quit",
        help: "Leave the console without logging out.",
    },
];

fn required_arg(name: &str, args: &str) -> Result<String, String> {
    let arg = args.trim();
    if arg.is_empty() {
        let usage = find_command(name).map_or(name, |command| command.usage);
        Err(format!("Usage: {usage}"))
    } else {
        Ok(arg.to_string())
    }
}

pub fn parse_command(input: &str) -> Result<ConsoleCommand, String> {
    let trimmed = input.trim();
    let (name, args) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));

    if let Some(panel) = Panel::parse(name).filter(|_| args.trim().is_empty()) {
        return Ok(ConsoleCommand::Switch(panel));
    }

    match name.to_lowercase().as_str() {
        "help" | "?" => Ok(ConsoleCommand::Help),
        "tab" => {
            let arg = required_arg("tab", args)?;
            Panel::parse(&arg)
                .map(ConsoleCommand::Switch)
                .ok_or_else(|| format!("Unknown panel: {arg}"))
        }
        "list" | "refresh" => Ok(ConsoleCommand::Refresh),
        "open" => required_arg("open", args).map(ConsoleCommand::Open),
        "new" => Ok(ConsoleCommand::New),
        "edit" => {
            let arg = args.trim();
            Ok(ConsoleCommand::Edit((!arg.is_empty()).then(|| arg.to_string())))
        }
        "delete" => required_arg("delete", args).map(ConsoleCommand::Delete),
        "publish" => required_arg("publish", args).map(ConsoleCommand::Publish),
        "public" => Ok(ConsoleCommand::Public),
        "activate" => required_arg("activate", args).map(ConsoleCommand::ActivateTrait),
        "logout" => Ok(ConsoleCommand::Logout),
        "quit" | "exit" => Ok(ConsoleCommand::Quit),
        _ => Err(format!("Unknown command: {name}. Type 'help' for a list.")),
    }
}

pub fn help_lines() -> Vec<String> {
    let width = all_commands()
        .iter()
        .map(|command| command.usage.len())
        .max()
        .unwrap_or(0);
    let mut lines: Vec<String> = all_commands()
        .iter()
        .map(|command| format!("  {:width$}  {}", command.usage, command.help))
        .collect();
    let panels: Vec<&str> = Panel::ALL.iter().map(|panel| panel.name()).collect();
    lines.push(format!("Panels: {}", panels.join(", ")));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_panel_name_switches() {
        assert_eq!(
            parse_command("memories"),
            Ok(ConsoleCommand::Switch(Panel::Memories))
        );
        assert_eq!(
            parse_command("tab custom-guidelines"),
            Ok(ConsoleCommand::Switch(Panel::CustomGuidelines))
        );
    }

    #[test]
    fn record_commands_need_an_id() {
        assert_eq!(
            parse_command("delete  12 "),
            Ok(ConsoleCommand::Delete("12".to_string()))
        );
        assert_eq!(parse_command("delete"), Err("Usage: delete <id>".to_string()));
        assert_eq!(
            parse_command("activate 4"),
            Ok(ConsoleCommand::ActivateTrait("4".to_string()))
        );
    }

    #[test]
    fn edit_id_is_optional() {
        assert_eq!(parse_command("edit"), Ok(ConsoleCommand::Edit(None)));
        assert_eq!(
            parse_command("EDIT tone"),
            Ok(ConsoleCommand::Edit(Some("tone".to_string())))
        );
    }

    #[test]
    fn unknown_input_is_reported() {
        assert!(parse_command("dance").unwrap_err().starts_with("Unknown command"));
        assert_eq!(
            parse_command("tab kitchen"),
            Err("Unknown panel: kitchen".to_string())
        );
    }

    #[test]
    fn help_lists_every_command_and_panel() {
        let lines = help_lines();
        assert_eq!(lines.len(), all_commands().len() + 1);
        assert!(lines.last().unwrap().contains("theamal"));
    }
}
