//! Line-oriented transport: reads chat lines from stdin, prints replies.
//!
//! Stands in for a chat network connection. Every line is treated as a
//! message posted by one fixed author in one fixed channel.
use anyhow::Result;
use log::info;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::handler::{Bot, Control, MessageContext};
use crate::pss::api::Fetcher;

/// Why the console loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleExit {
    EndOfInput,
    Restart,
}

/// Run the loop on the process's stdin/stdout.
pub async fn run_stdio<F: Fetcher>(bot: &Bot<F>, ctx: MessageContext) -> Result<ConsoleExit> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run(bot, ctx, stdin, &mut stdout).await
}

pub async fn run<F, R, W>(
    bot: &Bot<F>,
    ctx: MessageContext,
    input: R,
    output: &mut W,
) -> Result<ConsoleExit>
where
    F: Fetcher,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!(
        "console ready as {}@{}, prefix '{}'",
        ctx.author,
        ctx.channel,
        bot.config().bot.prefix
    );
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let response = bot.handle_message(&ctx, &line).await;
        for message in &response.messages {
            output.write_all(message.as_bytes()).await?;
            output.write_all(b"\n\n").await?;
        }
        output.flush().await?;
        if response.control == Some(Control::Restart) {
            return Ok(ConsoleExit::Restart);
        }
    }
    Ok(ConsoleExit::EndOfInput)
}
