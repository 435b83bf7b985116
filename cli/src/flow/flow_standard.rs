//! 标准（非 TUI）执行流：按配置渲染表单、提交一次模拟，并把回放逐行打印到 stdout。
use std::time::Duration;

use escoba_core::api::{
    CliError, FinalScores, LineKind, PlayerSlot, RunOutcome, SessionEvent, SessionPhase,
};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast::error::RecvError;

use crate::app::{build_form, RunContext};

/// Exit code for a run interrupted with Ctrl-C.
const EXIT_CANCELLED: i32 = 130;

pub async fn run_standard_flow(ctx: &RunContext) -> Result<i32, CliError> {
    let catalog = ctx.catalog.current().await;
    let form = build_form(&ctx.cfg.form, ctx.players, &catalog, &ctx.models);
    let config = form.build_configuration(ctx.api_key(), ctx.players);
    for (i, model) in config.models.iter().enumerate() {
        println!("AI Player {}: {}", i + 1, model);
    }

    let mut rx = ctx.controller.subscribe();
    let handle = ctx
        .controller
        .start(config)
        .await
        .ok_or_else(|| CliError::Command("a simulation is already running".to_string()))?;
    let spinner = requesting_spinner();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                ctx.controller.cancel().await;
                spinner.finish_and_clear();
                eprintln!("Cancelled.");
                break;
            }
            event = rx.recv() => match event {
                Ok(event) => {
                    if print_event(&spinner, event) {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(target: "escoba.cli", skipped = skipped, "session events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
    spinner.finish_and_clear();

    match handle.wait().await {
        RunOutcome::Completed { .. } => Ok(0),
        RunOutcome::Failed(err) => Err(CliError::Run(err)),
        RunOutcome::Cancelled => Ok(EXIT_CANCELLED),
        RunOutcome::Crashed(message) => Err(CliError::Anyhow(anyhow::anyhow!(message))),
    }
}

fn requesting_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} Waiting for simulation... {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message("0s");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Returns true once the run has ended.
fn print_event(spinner: &ProgressBar, event: SessionEvent) -> bool {
    let done = event.is_terminal();
    match event {
        SessionEvent::Elapsed { secs, .. } => spinner.set_message(format!("{secs}s")),
        SessionEvent::PhaseChanged { to, .. } if to != SessionPhase::Requesting => {
            spinner.finish_and_clear();
        }
        SessionEvent::PlayersAnnounced { players, .. } => println!("{}", format_players(&players)),
        // Failures are reported once, by main, on exit.
        SessionEvent::Line { line, .. } if line.kind != LineKind::Failure => {
            println!("{}", line.text);
        }
        SessionEvent::TableChanged { cards, .. } => println!("    Table: [{}]", cards.join(", ")),
        SessionEvent::Completed { scores, .. } => {
            for line in format_final_scores(&scores) {
                println!("{line}");
            }
        }
        _ => {}
    }
    done
}

fn format_players(players: &[PlayerSlot]) -> String {
    let names: Vec<String> = players
        .iter()
        .map(|p| format!("{} ({})", p.label(), p.name))
        .collect();
    format!("Players: {}", names.join(", "))
}

/// Entry order is kept; the leader(s) are marked.
fn format_final_scores(scores: &FinalScores) -> Vec<String> {
    let leaders = scores.leaders();
    let mut lines = vec!["Final Scores".to_string()];
    for entry in scores.iter() {
        let mark = if leaders.contains(&entry.player.as_str()) {
            " (leader)"
        } else {
            ""
        };
        lines.push(format!("  {}: {}{}", entry.player, entry.display_score(), mark));
    }
    lines
}
