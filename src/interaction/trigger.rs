//! Replies to `m!<word>` messages from the trigger table.

use std::time::Duration;

use tracing::{Instrument, debug, error, instrument};

use crate::{
    base::types::{CooldownStatus, IncomingMessage, Res},
    service::{chat::ChatClient, cooldown::format_remaining, schedule::ScheduledTask},
};

use super::HandlerContext;

/// What a trigger message led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Sent by a bot, or not prefixed.
    Ignored,
    /// Prefixed, but the word is not in the table.
    Unmatched,
    /// The author is inside their cooldown window.
    Throttled { remaining: Duration },
    /// The stored response was posted.
    Replied,
}

/// Handles a message event.
///
/// Spawns a new task so the gateway is never blocked on chat I/O.
#[instrument(skip_all)]
pub fn handle_message(event: IncomingMessage, ctx: HandlerContext) {
    tokio::spawn(
        async move {
            // Process the event.
            let result = process_message(&event, &ctx).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling message: {:#}", err);
            }
        }
        .in_current_span(),
    );
}

/// Looks up the trigger word and replies, subject to the author's cooldown.
#[instrument(skip_all, fields(user = event.author_id, channel = event.channel_id))]
pub async fn process_message(event: &IncomingMessage, ctx: &HandlerContext) -> Res<TriggerOutcome> {
    if event.author_is_bot {
        return Ok(TriggerOutcome::Ignored);
    }

    let Some(word) = event.content.strip_prefix(ctx.config.trigger_prefix.as_str()) else {
        return Ok(TriggerOutcome::Ignored);
    };

    let Some(response) = ctx.store.lookup_trigger(word).await else {
        debug!("No trigger registered for `{}`.", word);
        return Ok(TriggerOutcome::Unmatched);
    };

    // Administrators never touch the cooldown tracker.
    if !event.author_is_admin
        && let CooldownStatus::Throttled { remaining } = ctx.cooldowns.check(event.author_id).await
    {
        debug!("User {} throttled for {:?}.", event.author_id, remaining);

        let warning_id = ctx.chat.reply_to_message(event.channel_id, event.message_id, &throttle_notice(remaining)).await?;
        schedule_warning_removal(ctx.chat.clone(), event.channel_id, warning_id, ctx.config.warning_display());

        return Ok(TriggerOutcome::Throttled { remaining });
    }

    ctx.chat.send_message(event.channel_id, &response).await?;

    Ok(TriggerOutcome::Replied)
}

/// The text of the throttle warning.
pub fn throttle_notice(remaining: Duration) -> String {
    format!("⏳ Please wait {} more seconds.", format_remaining(remaining))
}

/// Deletes the warning once its display window has passed; failures are swallowed.
fn schedule_warning_removal(chat: ChatClient, channel_id: u64, message_id: u64, display: Duration) -> ScheduledTask {
    ScheduledTask::after(display, async move {
        if let Err(err) = chat.delete_message(channel_id, message_id).await {
            debug!("Could not delete throttle warning {}: {}", message_id, err);
        }
    })
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_shows_one_decimal() {
        assert_eq!(throttle_notice(Duration::from_secs(8)), "⏳ Please wait 8.0 more seconds.");
        assert_eq!(throttle_notice(Duration::from_millis(2340)), "⏳ Please wait 2.3 more seconds.");
    }
}
