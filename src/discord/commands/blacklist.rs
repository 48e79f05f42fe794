// Discord commands for the banned-word blacklist.
//
// **Notice the pattern:**
// 1. Extract primitive data from Discord types
// 2. Call core service
// 3. Format the response based on the result
//
// This layer is THIN - no business logic, just translation.

use crate::core::automod::{format_rules, AutoModError, AutoModService, RuleFlag};
use crate::infra::automod::JsonRuleStore;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared state handed to every command and event handler.
pub struct Data {
    pub automod: Arc<AutoModService<JsonRuleStore>>,
}

/// Embed colors for command replies.
pub const MAIN_COLOR: u32 = 0x3498DB;
pub const ERROR_COLOR: u32 = 0xE74C3C;

/// Flag choices exposed on the `add` command. This is a closed set: unknown
/// flag strings can only enter the system through old stored documents,
/// never through this command.
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum FlagChoice {
    #[name = "Delete"]
    Delete,
    #[name = "Whole"]
    Whole,
    #[name = "Case"]
    Case,
}

impl From<FlagChoice> for RuleFlag {
    fn from(choice: FlagChoice) -> Self {
        match choice {
            FlagChoice::Delete => RuleFlag::Delete,
            FlagChoice::Whole => RuleFlag::Whole,
            FlagChoice::Case => RuleFlag::Case,
        }
    }
}

/// Manages blacklisted words.
///
/// Supported flags:
/// - `delete` (delete any message containing the word)
/// - `whole` (match only the word on its own, not inside another word)
/// - `case` (case-sensitive matching)
#[poise::command(
    slash_command,
    subcommands("add", "remove", "list"),
    required_permissions = "ADMINISTRATOR",
    guild_only
)]
pub async fn blacklist(_ctx: Context<'_>) -> Result<(), Error> {
    // Parent command - subcommands do the work
    Ok(())
}

/// Blacklist a word with given flags.
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn add(
    ctx: Context<'_>,
    #[description = "The word you want to ban"] word: String,
    #[description = "First flag for the word"] flag: Option<FlagChoice>,
    #[description = "Second flag for the word"] flag2: Option<FlagChoice>,
    #[description = "Third flag for the word"] flag3: Option<FlagChoice>,
) -> Result<(), Error> {
    let mut flags: Vec<RuleFlag> = Vec::new();
    for choice in [flag, flag2, flag3].into_iter().flatten() {
        let flag = RuleFlag::from(choice);
        if !flags.contains(&flag) {
            flags.push(flag);
        }
    }

    match ctx.data().automod.add_rule(&word, flags).await {
        Ok(()) => {
            send_success(ctx, format!("`{word}` was added to the blacklist.")).await?;
        }
        Err(err) => {
            report_error(ctx, "add", &err).await?;
        }
    }

    Ok(())
}

/// Remove a word from the blacklist.
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "The word you want to unban"] word: String,
) -> Result<(), Error> {
    match ctx.data().automod.remove_rule(&word).await {
        Ok(()) => {
            send_success(ctx, format!("`{word}` was removed from the blacklist.")).await?;
        }
        Err(err) => {
            report_error(ctx, "remove", &err).await?;
        }
    }

    Ok(())
}

/// Lists all the blacklisted words and their flags.
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    match ctx.data().automod.list_rules().await {
        Ok(rules) => {
            let embed = serenity::CreateEmbed::new()
                .title("Blacklisted words:")
                .description(format_rules(&rules))
                .color(MAIN_COLOR);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(err) => {
            report_error(ctx, "list", &err).await?;
        }
    }

    Ok(())
}

async fn send_success(ctx: Context<'_>, description: String) -> Result<(), Error> {
    let embed = serenity::CreateEmbed::new()
        .title("Success")
        .description(description)
        .color(MAIN_COLOR);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Report a failed operation to the invoker. Every error is a direct reply;
/// none of them takes the bot down.
async fn report_error(ctx: Context<'_>, operation: &str, err: &AutoModError) -> Result<(), Error> {
    if let AutoModError::Store(_) = err {
        tracing::error!("Blacklist {} failed to persist: {}", operation, err);
    }

    let embed = serenity::CreateEmbed::new()
        .title("Error")
        .description(err.to_string())
        .color(ERROR_COLOR);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
