use crate::App;
use crate::cli::parser::{Commands, YellowAction};
use crate::core::ledger;
use crate::errors::AppResult;
use crate::models::CardKind;
use crate::ui::messages::{info, success};

/// Wrap width for card notes.
const NOTE_WIDTH: usize = 72;

pub async fn handle(cmd: &Commands, app: &App) -> AppResult<()> {
    let Commands::Yellow { action } = cmd else {
        return Ok(());
    };
    let ctx = app.ctx();

    match action {
        YellowAction::List { user } => {
            let cards = app
                .store
                .read(|l| Ok(l.user(user).map(|u| u.yellow_cards.clone()).unwrap_or_default()))
                .await?;

            if cards.is_empty() {
                success("🎉 No yellow cards.");
                return Ok(());
            }

            println!("📒 Yellow cards ({}):", cards.len());
            for (i, card) in cards.iter().enumerate() {
                let date = card
                    .date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "----------".to_string());
                let kind = match card.kind {
                    CardKind::Late => "late",
                    CardKind::Manual => "manual",
                };
                let head = format!("{:>3}. {} [{}] ", i + 1, date, kind);
                let indent = " ".repeat(head.len());
                let options = textwrap::Options::new(NOTE_WIDTH)
                    .initial_indent(&head)
                    .subsequent_indent(&indent);
                println!("{}", textwrap::fill(&card.note, options));
            }
        }

        YellowAction::Give { user, reason } => {
            let card = ledger::give_yellow(&app.store, &ctx, user, reason).await?;
            success(format!("Yellow card issued to {}.", user));
            info(card.note);
        }

        YellowAction::Remove { user, number } => {
            let card = ledger::remove_yellow(&app.store, &ctx, user, *number).await?;
            success(format!("Yellow card #{} removed from {}.", number, user));
            info(card.note);
        }
    }

    Ok(())
}
