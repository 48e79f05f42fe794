// Discord-specific filtering - translates core match outcomes into deletions.

use crate::core::automod::{AutoModService, RuleStore};
use crate::discord::Error;
use poise::serenity_prelude as serenity;

/// Evaluate an incoming message against the blacklist and delete it when the
/// matching rule asks for that.
///
/// Returns `true` if the message was deleted.
pub async fn handle_message<S: RuleStore>(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    automod: &AutoModService<S>,
) -> Result<bool, Error> {
    // Bot-authored messages are never scanned (including our own).
    if msg.author.bot {
        return Ok(false);
    }

    let outcome = match automod.check_message(&msg.content).await {
        Some(outcome) => outcome,
        None => return Ok(false),
    };

    if !outcome.delete {
        // Matched a rule without the delete flag - leave the message alone.
        return Ok(false);
    }

    if let Err(e) = msg.delete(&ctx.http).await {
        tracing::warn!("Failed to delete blacklisted message: {}", e);
        return Ok(false);
    }

    tracing::info!(
        author_id = msg.author.id.get(),
        word = %outcome.word,
        "Deleted message containing blacklisted word"
    );

    Ok(true)
}
