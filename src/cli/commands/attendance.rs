use crate::App;
use crate::cli::parser::Commands;
use crate::core::ledger::{self, CheckInOutcome, CheckOutOutcome};
use crate::core::rewards::MINUTES_PER_POINT;
use crate::core::yellow_cards::YELLOW_CARD_PENALTY;
use crate::errors::AppResult;
use crate::models::EventType;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::colorize_in_out;
use crate::utils::mins2readable;

/// How many history rows are shown.
const HISTORY_LEN: usize = 10;

pub async fn handle(cmd: &Commands, app: &App) -> AppResult<()> {
    let ctx = app.ctx();

    match cmd {
        Commands::Checkin { user, name } => {
            match ledger::check_in(&app.store, &ctx, user, name.as_deref()).await? {
                CheckInOutcome::Rejected(r) => warning(r),
                CheckInOutcome::CheckedIn(report) => {
                    let time = report.at.format("%H:%M").to_string();
                    if report.yellow_card {
                        warning(format!(
                            "Late! Yellow card issued, but your check-in at {} is recorded",
                            colorize_in_out(&time, true)
                        ));
                        println!(
                            "- Late penalty: -{} points. Balance: {} pts.",
                            YELLOW_CARD_PENALTY, report.points
                        );
                    } else {
                        success(format!(
                            "Check-in recorded for {} at {}",
                            report.display,
                            colorize_in_out(&time, true)
                        ));
                    }

                    if report.early_bird {
                        success(format!(
                            "🏅 You were among today's first {}; +1 point!",
                            app.policy.early_bird_winners
                        ));
                    }
                    if report.team_awarded.contains(&report.user_id) {
                        success(
                            "🎉 The whole team checked in before the deadline today; +1 point for everyone!",
                        );
                    }

                    println!();
                    println!("{}", report.ladder);
                }
            }
        }

        Commands::Checkout { user } => {
            match ledger::check_out(&app.store, &ctx, user, None).await? {
                CheckOutOutcome::Rejected(r) => warning(r),
                CheckOutOutcome::CheckedOut(report) => {
                    let time = report.at.format("%H:%M").to_string();
                    let worked = report
                        .worked_minutes
                        .map(|m| format!(", worked {} today", mins2readable(m, false, false)))
                        .unwrap_or_default();
                    success(format!(
                        "Check-out recorded for {} at {}{}",
                        report.display,
                        colorize_in_out(&time, false),
                        worked
                    ));

                    if report.overtime_minutes > 0 {
                        if report.overtime_points > 0 {
                            let mut line = format!(
                                "🏆 {} overtime minutes recorded today, +{} points.",
                                report.overtime_minutes, report.overtime_points
                            );
                            if report.overtime_remaining > 0 {
                                line.push_str(&format!(
                                    " {} minutes banked toward the next point.",
                                    report.overtime_remaining
                                ));
                            }
                            println!("{}", line);
                        } else {
                            println!(
                                "⏱️ {} overtime minutes recorded today. {} minutes to the next point.",
                                report.overtime_minutes,
                                MINUTES_PER_POINT - report.overtime_remaining
                            );
                        }
                    }
                }
            }
        }

        Commands::Ladder => {
            println!("{}", ledger::ladder(&app.store, &ctx).await?);
        }

        Commands::History { user, outs } => {
            let kind = if *outs { EventType::Out } else { EventType::In };
            let events = app
                .store
                .read(|l| {
                    Ok(l.user(user)
                        .map(|u| if *outs { u.check_outs.clone() } else { u.check_ins.clone() })
                        .unwrap_or_default())
                })
                .await?;

            if events.is_empty() {
                info(format!("No {} recorded.", kind.label()));
                return Ok(());
            }

            println!("📋 Last {} entries ({}):", HISTORY_LEN, kind.label());
            let skip = events.len().saturating_sub(HISTORY_LEN);
            for ev in events.iter().skip(skip) {
                println!(
                    "- {} {}",
                    ev.date_str(),
                    colorize_in_out(&ev.time_str(), kind.is_in())
                );
            }
        }

        _ => {}
    }

    Ok(())
}
