//! TUI 执行流：表单与回放面板在同一个事件循环里，Enter 开始一次运行，Esc/Ctrl-C 取消并退出。
use std::time::Duration;

use escoba_core::api::CliError;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::broadcast::error::RecvError;

use crate::app::{build_form, RunContext};
use crate::tui::events::InputReader;
use crate::tui::{restore_terminal, setup_terminal, ui, AppAction, TuiApp};

pub async fn run_tui_flow(ctx: &RunContext) -> Result<i32, CliError> {
    let catalog = ctx.catalog.current().await;
    let form = build_form(&ctx.cfg.form, ctx.players, &catalog, &ctx.models);
    let mut app = TuiApp::new(
        ctx.cfg.tui.clone(),
        ctx.cfg.form.clone(),
        form,
        catalog,
        ctx.api_key().to_string(),
    );

    let mut terminal = setup_terminal().map_err(CliError::Command)?;
    let result = run_event_loop(&mut terminal, &mut app, ctx).await;
    restore_terminal(&mut terminal);
    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut TuiApp,
    ctx: &RunContext,
) -> Result<i32, CliError> {
    tracing::debug!(target: "escoba.tui", "TUI event loop starting");
    let controller = &ctx.controller;
    let (input_reader, mut input_rx) = InputReader::start();
    let mut session_rx = controller.subscribe();
    let mut tick =
        tokio::time::interval(Duration::from_millis(app.config.update_interval_ms.max(16)));

    let result = loop {
        tokio::select! {
            Some(key) = input_rx.recv() => match app.handle_key(key) {
                AppAction::Start => {
                    if controller.start(app.build_configuration()).await.is_none() {
                        tracing::debug!(target: "escoba.tui", "start ignored, run in progress");
                    }
                }
                AppAction::Exit => {
                    controller.cancel().await;
                    break Ok(0);
                }
                AppAction::None => {}
            },
            event = session_rx.recv() => {
                match event {
                    Ok(event) => app.on_session_event(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(target: "escoba.tui", skipped = skipped, "session events lagged");
                    }
                    Err(RecvError::Closed) => break Ok(0),
                }
                app.sync(controller.panels().await, controller.phase().await);
            }
            _ = tick.tick() => {}
        }

        if let Err(e) = terminal.draw(|f| ui::draw(f, app)) {
            break Err(CliError::Command(e.to_string()));
        }
    };

    input_reader.stop();
    result
}
