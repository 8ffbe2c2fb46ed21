//! Administrator slash commands.
//!
//! Every command is gated on the administrator permission before any
//! command-specific work happens.

use std::collections::HashMap;

use crate::{
    base::types::{AdminCommand, IncomingCommand, PanelButton, PanelList, TriggerTable},
    prelude::*,
};

use super::{HandlerContext, PERMISSION_DENIED, button::panel_button_id};

/// Platform message length limit.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Buttons per row and rows per message.
pub const BUTTONS_PER_ROW: usize = 5;
pub const MAX_BUTTON_ROWS: usize = 5;

/// Platform button label limit.
pub const MAX_LABEL_CHARS: usize = 80;

const SAVE_FAILED: &str = "⚠️ Could not save the change. Check the bot logs.";

// Command surface.

/// A string option on a slash command.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
}

/// A slash command as registered with the platform.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub options: &'static [OptionSpec],
}

/// Every command the bot registers. All of them are administrator-only.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "madd",
        description: "[Admin] Save a text to the button panel",
        options: &[OptionSpec {
            name: "content",
            description: "Text to post when the button is pressed",
        }],
    },
    CommandSpec {
        name: "mtrigger",
        description: "[Admin] Register a trigger word",
        options: &[
            OptionSpec {
                name: "trigger",
                description: "Word that follows the prefix",
            },
            OptionSpec {
                name: "response",
                description: "Reply to post",
            },
        ],
    },
    CommandSpec {
        name: "mtriggerlist",
        description: "[Admin] List registered triggers",
        options: &[],
    },
    CommandSpec {
        name: "mpanel",
        description: "[Admin] Show the button panel",
        options: &[],
    },
    CommandSpec {
        name: "mclear",
        description: "[Admin] Delete all triggers and panel texts",
        options: &[],
    },
    CommandSpec {
        name: "mhelp",
        description: "[Admin] Show administrator help",
        options: &[],
    },
];

impl AdminCommand {
    /// Builds a command from its name and string options.
    ///
    /// Returns `None` for unknown commands or missing options; see [`AdminCommand::from_interaction`].
    pub fn parse(name: &str, options: &HashMap<String, String>) -> Option<Self> {
        let option = |key: &str| options.get(key).cloned();

        let command = match name {
            "madd" => AdminCommand::Add { content: option("content")? },
            "mtrigger" => AdminCommand::Trigger {
                trigger: option("trigger")?,
                response: option("response")?,
            },
            "mtriggerlist" => AdminCommand::TriggerList,
            "mpanel" => AdminCommand::Panel,
            "mclear" => AdminCommand::Clear,
            "mhelp" => AdminCommand::Help,
            _ => return None,
        };

        Some(command)
    }

    /// Like [`AdminCommand::parse`], but keeps unparsable commands as [`AdminCommand::Unknown`]
    /// so they still reach the administrator gate.
    pub fn from_interaction(name: &str, options: &HashMap<String, String>) -> Self {
        Self::parse(name, options).unwrap_or_else(|| AdminCommand::Unknown { name: name.to_string() })
    }
}

// Handlers.

/// Handles a slash command event.
#[instrument(skip_all)]
pub fn handle_command(event: IncomingCommand, ctx: HandlerContext) {
    tokio::spawn(
        async move {
            // Process the event.
            let result = process_command(&event, &ctx).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling command: {:#}", err);
            }
        }
        .in_current_span(),
    );
}

/// Runs an administrator command and answers the interaction.
#[instrument(skip_all, fields(user = event.user_id, command = ?event.command))]
pub async fn process_command(event: &IncomingCommand, ctx: &HandlerContext) -> Void {
    let interaction = &event.interaction;

    if !event.user_is_admin {
        warn!("Denied command from non-administrator {}.", event.user_id);
        return ctx.chat.respond_ephemeral(interaction, PERMISSION_DENIED).await;
    }

    let prefix = ctx.config.trigger_prefix.as_str();

    match &event.command {
        AdminCommand::Trigger { trigger, response } => {
            let reply = match ctx.store.upsert_trigger(trigger, response).await {
                Ok(()) => {
                    info!("Registered trigger `{}`.", trigger);
                    format!("✅ Registered {prefix}{trigger}.")
                }
                Err(err) => {
                    error!("Failed to save trigger `{}`: {:#}", trigger, err);
                    SAVE_FAILED.to_string()
                }
            };

            ctx.chat.respond_ephemeral(interaction, &reply).await
        }
        AdminCommand::Add { content } => {
            let reply = match ctx.store.append_panel(content).await {
                Ok(index) => {
                    info!("Appended panel entry {}.", index);
                    format!("✅ Saved to the panel as button {}.", index + 1)
                }
                Err(err) => {
                    error!("Failed to save panel entry: {:#}", err);
                    SAVE_FAILED.to_string()
                }
            };

            ctx.chat.respond_ephemeral(interaction, &reply).await
        }
        AdminCommand::TriggerList => {
            let triggers = ctx.store.load_triggers().await;
            ctx.chat.respond_ephemeral(interaction, &render_trigger_list(&triggers, prefix)).await
        }
        AdminCommand::Panel => {
            let panel = ctx.store.load_panel().await;

            if panel.is_empty() {
                return ctx.chat.respond_ephemeral(interaction, "📭 The panel is empty. Add texts with /madd.").await;
            }

            let (text, buttons) = render_panel(&panel);
            ctx.chat.respond_with_buttons(interaction, &text, buttons).await
        }
        AdminCommand::Clear => {
            let reply = match ctx.store.clear_all().await {
                Ok(()) => {
                    info!("Cleared all triggers and panel entries.");
                    "🗑️ Deleted all triggers and panel texts.".to_string()
                }
                Err(err) => {
                    error!("Failed to clear data: {:#}", err);
                    SAVE_FAILED.to_string()
                }
            };

            ctx.chat.respond_ephemeral(interaction, &reply).await
        }
        AdminCommand::Help => ctx.chat.respond_ephemeral(interaction, &render_help(prefix)).await,
        AdminCommand::Unknown { name } => {
            warn!("Received unknown command `{}`.", name);
            Ok(())
        }
    }
}

// Rendering.

/// Lists triggers one per line, sorted by word, within the message limit.
pub fn render_trigger_list(triggers: &TriggerTable, prefix: &str) -> String {
    if triggers.is_empty() {
        return "📭 No triggers registered.".to_string();
    }

    let mut out = format!("### 📋 Triggers ({})", triggers.len());

    for (shown, (word, response)) in triggers.iter().enumerate() {
        let preview = truncate_chars(response.lines().next().unwrap_or_default(), 60);
        let line = format!("\n- `{prefix}{word}` → {preview}");

        // Leave room for the overflow note.
        if out.chars().count() + line.chars().count() > MAX_MESSAGE_CHARS - 40 {
            out.push_str(&format!("\n…and {} more.", triggers.len() - shown));
            break;
        }

        out.push_str(&line);
    }

    out
}

/// Builds the panel message text and one button per entry, up to the platform limit.
pub fn render_panel(panel: &PanelList) -> (String, Vec<PanelButton>) {
    let max = BUTTONS_PER_ROW * MAX_BUTTON_ROWS;

    let buttons = panel
        .iter()
        .enumerate()
        .take(max)
        .map(|(index, text)| PanelButton {
            custom_id: panel_button_id(index),
            label: truncate_chars(&format!("{}. {}", index + 1, text.lines().next().unwrap_or_default()), MAX_LABEL_CHARS),
        })
        .collect();

    let mut text = "### 🎛️ Panel\nPress a button to post its text in this channel.".to_string();

    if panel.len() > max {
        text.push_str(&format!("\nOnly the first {} of {} texts are shown.", max, panel.len()));
    }

    (text, buttons)
}

/// Lists every administrator command.
pub fn render_help(prefix: &str) -> String {
    let mut out = "### 🛠️ Administrator help".to_string();

    for command in COMMANDS {
        let args: String = command.options.iter().map(|o| format!(" <{}>", o.name)).collect();
        out.push_str(&format!("\n- `/{}{}`: {}", command.name, args, command.description.trim_start_matches("[Admin] ")));
    }

    out.push_str(&format!("\nMembers trigger replies with `{prefix}<word>`."));

    out
}

/// Shortens `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

// Tests.
