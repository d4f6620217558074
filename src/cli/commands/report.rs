use crate::App;
use crate::cli::parser::Commands;
use crate::core::report::{ReportOptions, average_checkins};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info};
use crate::utils::date::{parse_weekday_list, weekday_short_name};
use crate::utils::table::{Column, Table};

pub async fn handle(cmd: &Commands, app: &App) -> AppResult<()> {
    let Commands::Report {
        days,
        exclude_users,
        exclude_weekdays,
        limit,
    } = cmd
    else {
        return Ok(());
    };

    let mut options = ReportOptions::new(app.policy.short_day);
    options.days = *days;
    options.exclude_users = exclude_users
        .iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();
    if let Some(list) = exclude_weekdays {
        options.exclude_weekdays = parse_weekday_list(list)?.into_iter().collect();
    }
    options.limit = match limit {
        Some(n) if *n <= 0 => {
            return Err(AppError::InvalidOption(
                "limit must be greater than zero".to_string(),
            ));
        }
        Some(n) => Some(*n as usize),
        None => None,
    };

    let now = app.clock.now();
    let rows = app
        .store
        .read(|ledger| average_checkins(ledger, now, &options))
        .await?;

    let mut skipped: Vec<_> = options.exclude_weekdays.iter().copied().collect();
    skipped.sort_by_key(|d| d.num_days_from_monday());
    let skipped = if skipped.is_empty() {
        "no weekday filter".to_string()
    } else {
        format!(
            "{} excluded",
            skipped
                .iter()
                .map(|d| weekday_short_name(*d))
                .collect::<Vec<_>>()
                .join(", ")
        )
    };
    header(format!("Average check-in, last {} days ({})", options.days, skipped));

    if !options.exclude_users.is_empty() {
        let users: Vec<&str> = options.exclude_users.iter().map(String::as_str).collect();
        println!("Excluded users: {}", users.join(", "));
    }

    if rows.is_empty() {
        info("No check-ins in this window.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::new("#"),
        Column::new("User"),
        Column::new("Avg"),
        Column::new("Days"),
    ]);
    for (i, row) in rows.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            row.username.clone(),
            row.time().format("%H:%M").to_string(),
            row.samples.to_string(),
        ]);
    }
    print!("{}", table.render());
    Ok(())
}
