//! Discord integration for mania-bot.
//!
//! This module provides:
//! - `DiscordChatClient`, the serenity-backed `GenericChatClient`
//! - `DiscordHandler`, which turns gateway events into platform-neutral
//!   events and hands them to the dispatchers
//! - Slash command registration

use std::{collections::HashMap, sync::Arc};

use anyhow::anyhow;
use async_trait::async_trait;
use serenity::{
    Client,
    all::{
        ButtonStyle, ChannelId, Command, CommandInteraction, CommandOptionType, ComponentInteraction, Context, CreateActionRow, CreateButton, CreateCommand,
        CreateCommandOption, CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage, EventHandler, GatewayIntents, GuildId, Http, Interaction, InteractionId,
        Member, Message, MessageId, Permissions, Ready,
    },
};
use tracing::{debug, error, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{AdminCommand, IncomingButton, IncomingCommand, IncomingMessage, InteractionRef, PanelButton, Res, Void},
    },
    interaction::{
        HandlerContext, button,
        command::{self, BUTTONS_PER_ROW, COMMANDS},
        trigger,
    },
    service::{cooldown::CooldownTracker, health::BotStatus, store::StoreClient},
};

use super::{ChatClient, GenericChatClient};

// Extra methods on `ChatClient` applied by the discord implementation.

impl ChatClient {
    /// Creates a Discord chat client over a serenity HTTP client.
    pub fn discord(http: Arc<Http>) -> Self {
        Self::new(Arc::new(DiscordChatClient { http }))
    }
}

// Structs.

/// Discord client implementation.
#[derive(Clone)]
struct DiscordChatClient {
    http: Arc<Http>,
}

impl DiscordChatClient {
    async fn respond(&self, interaction: &InteractionRef, response: CreateInteractionResponse) -> Void {
        self.http
            .create_interaction_response(InteractionId::new(interaction.id), &interaction.token, &response, Vec::new())
            .await
            .map_err(|e| anyhow!("Failed to respond to interaction: {}", e))
    }
}

#[async_trait]
impl GenericChatClient for DiscordChatClient {
    #[instrument(skip(self, text))]
    async fn send_message(&self, channel_id: u64, text: &str) -> Void {
        ChannelId::new(channel_id).say(&*self.http, text).await.map_err(|e| anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn reply_to_message(&self, channel_id: u64, message_id: u64, text: &str) -> Res<u64> {
        let channel = ChannelId::new(channel_id);
        let builder = CreateMessage::new().content(text).reference_message((channel, MessageId::new(message_id)));

        let sent = channel.send_message(&*self.http, builder).await.map_err(|e| anyhow!("Failed to reply to message: {}", e))?;

        Ok(sent.id.get())
    }

    #[instrument(skip(self))]
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Void {
        ChannelId::new(channel_id)
            .delete_message(&self.http, MessageId::new(message_id))
            .await
            .map_err(|e| anyhow!("Failed to delete message: {}", e))
    }

    #[instrument(skip_all)]
    async fn respond_ephemeral(&self, interaction: &InteractionRef, text: &str) -> Void {
        let message = CreateInteractionResponseMessage::new().content(text).ephemeral(true);

        self.respond(interaction, CreateInteractionResponse::Message(message)).await
    }

    #[instrument(skip_all)]
    async fn respond_with_buttons(&self, interaction: &InteractionRef, text: &str, buttons: Vec<PanelButton>) -> Void {
        let rows = buttons
            .chunks(BUTTONS_PER_ROW)
            .map(|row| {
                CreateActionRow::Buttons(
                    row.iter()
                        .map(|b| CreateButton::new(b.custom_id.clone()).label(b.label.clone()).style(ButtonStyle::Primary))
                        .collect(),
                )
            })
            .collect();

        let message = CreateInteractionResponseMessage::new().content(text).components(rows).ephemeral(true);

        self.respond(interaction, CreateInteractionResponse::Message(message)).await
    }

    #[instrument(skip_all)]
    async fn acknowledge(&self, interaction: &InteractionRef) -> Void {
        self.respond(interaction, CreateInteractionResponse::Acknowledge).await
    }
}

/// Gateway event handler.
///
/// Holds the shared services; a `ChatClient` is built per event from the
/// context's HTTP client.
#[derive(Clone)]
pub struct DiscordHandler {
    pub config: Config,
    pub store: StoreClient,
    pub cooldowns: CooldownTracker,
    pub status: BotStatus,
}

impl DiscordHandler {
    fn handler_context(&self, ctx: &Context) -> HandlerContext {
        HandlerContext {
            config: self.config.clone(),
            store: self.store.clone(),
            cooldowns: self.cooldowns.clone(),
            chat: ChatClient::discord(ctx.http.clone()),
        }
    }

    /// Connects to the gateway and processes events until the session ends.
    pub async fn start_session(self, token: &str) -> Void {
        let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

        let mut client = Client::builder(token, intents)
            .event_handler(self)
            .await
            .map_err(|e| anyhow!("Failed to create Discord client: {}", e))?;

        info!("Starting Discord gateway connection ...");

        client.start().await.map_err(|e| anyhow!("Discord client error: {}", e))?;

        Ok(())
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        let tag = ready.user.tag();
        info!("Discord bot online: {}", tag);

        self.status.set_bot_tag(tag).await;

        register_commands(&ctx.http).await;
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Cheap checks first so ordinary chatter never spawns a task.
        if msg.author.bot || !msg.content.starts_with(self.config.trigger_prefix.as_str()) {
            return;
        }

        let event = IncomingMessage {
            message_id: msg.id.get(),
            channel_id: msg.channel_id.get(),
            author_id: msg.author.id.get(),
            author_is_bot: msg.author.bot,
            author_is_admin: author_is_admin(msg.guild_id, msg.author_permissions(&ctx.cache)),
            content: msg.content.clone(),
        };

        trigger::handle_message(event, self.handler_context(&ctx));
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(cmd) => command::handle_command(incoming_command(&cmd), self.handler_context(&ctx)),
            Interaction::Component(comp) => button::handle_button(incoming_button(&comp), self.handler_context(&ctx)),
            _ => debug!("Received unhandled interaction."),
        }
    }
}

// Helpers.

/// Registers every slash command globally; failures are logged and the session continues.
async fn register_commands(http: &Arc<Http>) {
    let commands = COMMANDS
        .iter()
        .map(|spec| {
            spec.options.iter().fold(CreateCommand::new(spec.name).description(spec.description), |cmd, option| {
                cmd.add_option(CreateCommandOption::new(CommandOptionType::String, option.name, option.description).required(true))
            })
        })
        .collect();

    match Command::set_global_commands(http, commands).await {
        Ok(registered) => info!("Registered {} slash commands.", registered.len()),
        Err(err) => error!("Failed to register slash commands: {}", err),
    }
}

fn has_admin(permissions: Option<Permissions>) -> bool {
    permissions.is_some_and(|p| p.contains(Permissions::ADMINISTRATOR))
}

/// Message authors outside a guild are never administrators.
fn author_is_admin(guild_id: Option<GuildId>, permissions: Option<Permissions>) -> bool {
    guild_id.is_some() && has_admin(permissions)
}

/// Interactions carry a member (with resolved permissions) only inside a guild.
fn is_admin(member: Option<&Member>) -> bool {
    has_admin(member.and_then(|m| m.permissions))
}

fn incoming_command(command: &CommandInteraction) -> IncomingCommand {
    let options: HashMap<String, String> = command
        .data
        .options
        .iter()
        .filter_map(|o| o.value.as_str().map(|v| (o.name.clone(), v.to_string())))
        .collect();

    IncomingCommand {
        interaction: InteractionRef {
            id: command.id.get(),
            token: command.token.clone(),
        },
        channel_id: command.channel_id.get(),
        user_id: command.user.id.get(),
        user_is_admin: is_admin(command.member.as_deref()),
        command: AdminCommand::from_interaction(&command.data.name, &options),
    }
}

fn incoming_button(component: &ComponentInteraction) -> IncomingButton {
    IncomingButton {
        interaction: InteractionRef {
            id: component.id.get(),
            token: component.token.clone(),
        },
        channel_id: component.channel_id.get(),
        user_id: component.user.id.get(),
        user_is_admin: is_admin(component.member.as_ref()),
        custom_id: component.data.custom_id.clone(),
    }
}

// Tests.
