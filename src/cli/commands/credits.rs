use crate::App;
use crate::cli::parser::Commands;
use crate::core::credits::{self, POINT_VALUE, points_value};
use crate::core::{ledger, rewards};
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{colorize_points, colorize_status};
use crate::utils::group_thousands;
use crate::utils::table::{Column, Table};
use crate::utils::time::format_ledger_datetime;

fn points_line(points: i64, balance: i64) -> String {
    format!("{} pts (≈ {})", colorize_points(points), group_thousands(balance))
}

pub async fn handle(cmd: &Commands, app: &App) -> AppResult<()> {
    let ctx = app.ctx();

    match cmd {
        Commands::Balance { user } => {
            let report = ledger::balance(&app.store, user).await?;
            println!("💰 Points      : {}", points_line(report.points, report.balance));
            println!("⏱️  Overtime bank: {} min", report.overtime_minutes_bank);
            println!("1 point = {}", group_thousands(POINT_VALUE));
        }

        Commands::Scores { user } => {
            let rows = app.store.read(|l| Ok(rewards::points_leaderboard(l))).await?;

            if let Some(user) = user {
                match rows.iter().find(|r| &r.user_id == user) {
                    Some(mine) => println!(
                        "Your score: {} (rank {} of {})",
                        points_line(mine.points, mine.value),
                        mine.rank,
                        rows.len()
                    ),
                    None => println!("Your score: {}", points_line(0, 0)),
                }
                println!();
            }

            if rows.is_empty() {
                info("Nobody has points yet.");
                return Ok(());
            }

            header("🏆 Points leaderboard");
            let mut table = Table::new(vec![
                Column::new("#"),
                Column::new("Name"),
                Column::new("Points"),
                Column::new("Value"),
            ]);
            for row in &rows {
                table.add_row(vec![
                    row.rank.to_string(),
                    row.name.clone(),
                    row.points.to_string(),
                    group_thousands(row.value),
                ]);
            }
            print!("{}", table.render());
        }

        Commands::Withdraw { user, amount } => {
            let receipt = ledger::request_withdrawal(&app.store, &ctx, user, *amount).await?;
            success(format!(
                "Withdrawal request #{} for {} submitted ({} points held).",
                receipt.number,
                group_thousands(receipt.request.amount),
                receipt.request.held_points(POINT_VALUE)
            ));
            println!("Remaining: {}", points_line(receipt.points, receipt.balance));
        }

        Commands::Withdrawals { user: None, .. } => {
            let queue = app.store.read(|l| Ok(credits::pending_withdrawals(l))).await?;
            if queue.is_empty() {
                info("No pending requests 🎉");
                return Ok(());
            }

            header("⏳ Pending withdrawal requests");
            let mut table = Table::new(vec![
                Column::new("User"),
                Column::new("Id"),
                Column::new("#"),
                Column::new("Amount"),
                Column::new("Requested"),
            ]);
            for item in &queue {
                table.add_row(vec![
                    item.name.clone(),
                    item.user_id.clone(),
                    item.number.to_string(),
                    group_thousands(item.request.amount),
                    format_ledger_datetime(&item.request.datetime),
                ]);
            }
            print!("{}", table.render());
        }

        Commands::Withdrawals {
            user: Some(user), ..
        } => {
            let requests = app
                .store
                .read(|l| Ok(l.user(user).map(|u| u.withdrawals.clone()).unwrap_or_default()))
                .await?;

            if requests.is_empty() {
                info("No withdrawal requests.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("#"),
                Column::new("Requested"),
                Column::new("Amount"),
                Column::new("Points"),
                Column::new("Status"),
            ]);
            for (i, req) in requests.iter().enumerate() {
                table.add_row(vec![
                    (i + 1).to_string(),
                    format_ledger_datetime(&req.datetime),
                    group_thousands(req.amount),
                    req.held_points(POINT_VALUE).to_string(),
                    req.status.to_string(),
                ]);
            }
            print!("{}", table.render());
        }

        Commands::Approve { user, request } => {
            let req = ledger::approve_withdrawal(&app.store, &ctx, user, *request).await?;
            success(format!(
                "Withdrawal #{} of {} for {} is now {}.",
                request,
                group_thousands(req.amount),
                user,
                colorize_status(req.status.as_str())
            ));
        }

        Commands::Reject { user, request } => {
            let refund = ledger::reject_withdrawal(&app.store, &ctx, user, *request).await?;
            success(format!(
                "Withdrawal #{} of {} for {} is now {}; {} points refunded.",
                request,
                group_thousands(refund.request.amount),
                user,
                colorize_status(refund.request.status.as_str()),
                refund.points_refunded
            ));
        }

        Commands::Transfer { from, to, amount } => {
            let receipt = ledger::transfer(&app.store, &ctx, from, to, *amount).await?;
            success(format!(
                "Transferred {} points from {} to {}.",
                receipt.amount, receipt.source, receipt.target
            ));
            println!(
                "Your balance: {}",
                points_line(receipt.source_points, points_value(receipt.source_points))
            );
        }

        _ => {}
    }

    Ok(())
}
