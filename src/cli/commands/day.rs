use crate::App;
use crate::cli::parser::{Commands, DayAction};
use crate::core::ledger;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::date::parse_date;
use crate::utils::time::parse_hhmm;

pub async fn handle(cmd: &Commands, app: &App) -> AppResult<()> {
    let Commands::Day { action } = cmd else {
        return Ok(());
    };

    match action {
        DayAction::Unlimit { date } => {
            let day = match date {
                Some(d) => parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?,
                None => app.clock.today(),
            };
            if ledger::unlimit_day(&app.store, day).await? {
                success(format!("{} is now unlimited: nobody is late that day.", day));
            } else {
                info(format!("{} was already unlimited.", day));
            }
        }

        DayAction::Limit { time, clear } => {
            let limit = match (time, clear) {
                (_, true) => None,
                (Some(t), false) => Some(parse_hhmm(t)?),
                (None, false) => {
                    return Err(AppError::InvalidOption(
                        "give a cutoff time (HH:MM) or --clear".to_string(),
                    ));
                }
            };
            ledger::set_checkin_limit(&app.store, limit).await?;
            match limit {
                Some(t) => success(format!("Check-in cutoff set to {}.", t.format("%H:%M"))),
                None => success(format!(
                    "Check-in cutoff reset to the default {}.",
                    app.policy.default_checkin_limit.format("%H:%M")
                )),
            }
        }
    }

    Ok(())
}
