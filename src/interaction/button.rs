//! Panel button presses.

use crate::{base::types::IncomingButton, prelude::*};

use super::{HandlerContext, PERMISSION_DENIED};

/// Custom ID prefix of panel buttons; the panel index follows it.
pub const PANEL_BUTTON_PREFIX: &str = "send_msg_";

/// Custom ID for the panel button at `index`.
pub fn panel_button_id(index: usize) -> String {
    format!("{PANEL_BUTTON_PREFIX}{index}")
}

/// Handles a button event.
#[instrument(skip_all)]
pub fn handle_button(event: IncomingButton, ctx: HandlerContext) {
    tokio::spawn(
        async move {
            // Process the event.
            let result = process_button(&event, &ctx).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling button: {:#}", err);
            }
        }
        .in_current_span(),
    );
}

/// Posts the panel text a button refers to.
///
/// An index with no panel entry posts nothing, but the press is still acknowledged.
#[instrument(skip_all, fields(user = event.user_id, custom_id = %event.custom_id))]
pub async fn process_button(event: &IncomingButton, ctx: &HandlerContext) -> Void {
    if !event.user_is_admin {
        warn!("Denied button press from non-administrator {}.", event.user_id);
        return ctx.chat.respond_ephemeral(&event.interaction, PERMISSION_DENIED).await;
    }

    let Some(raw_index) = event.custom_id.strip_prefix(PANEL_BUTTON_PREFIX) else {
        debug!("Ignoring button that is not a panel button.");
        return Ok(());
    };

    if let Ok(index) = raw_index.parse::<usize>()
        && let Some(text) = ctx.store.panel_entry(index).await
    {
        ctx.chat.send_message(event.channel_id, &text).await?;
        info!("Posted panel entry {}.", index);
    } else {
        debug!("No panel entry for `{}`.", raw_index);
    }

    ctx.chat.acknowledge(&event.interaction).await
}
