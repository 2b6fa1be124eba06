use std::io::Write;
use std::sync::Arc;

use roundtimer_core::notify::{LogNotifier, MutedNotifier};
use roundtimer_core::timer::{SystemClock, TokioTicker};
use roundtimer_core::{Config, Notifier, PhaseEngine, Session, StatusView, TimerConfig};

use super::SessionArgs;
use crate::notifier::TerminalNotifier;

pub fn run(args: SessionArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let timer = args.timer_config(&config);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(timer, &config, json))
}

/// Terminal output is reserved for the event stream in `--json` mode, so
/// notifications go to the log there.
fn notifier_for(config: &Config, json: bool) -> Arc<dyn Notifier> {
    match (config.notifications.enabled, json) {
        (false, _) => Arc::new(MutedNotifier),
        (true, true) => Arc::new(LogNotifier),
        (true, false) => Arc::new(TerminalNotifier::new(config.notifications.bell)),
    }
}

async fn drive(
    timer: TimerConfig,
    config: &Config,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = PhaseEngine::new(Arc::new(SystemClock), notifier_for(config, json));
    let mut session = Session::new(engine, TokioTicker::current());
    let mut status = session.subscribe();
    let mut events = session.events();

    tracing::info!(
        focus = timer.focus_duration_min(),
        break_min = timer.break_duration_min(),
        rounds = timer.total_rounds(),
        "starting session"
    );
    session.start(&timer)?;

    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = status.borrow_and_update().clone();
                if !json {
                    render(&view)?;
                }
                if !view.running {
                    break;
                }
            }
            Ok(event) = events.recv(), if json => {
                println!("{}", serde_json::to_string(&event)?);
            }
            _ = tokio::signal::ctrl_c() => {
                session.stop()?;
                if !json {
                    render(&session.status()?)?;
                }
                break;
            }
        }
    }

    if json {
        while let Ok(event) = events.try_recv() {
            println!("{}", serde_json::to_string(&event)?);
        }
    } else {
        println!();
    }
    Ok(())
}

fn render(view: &StatusView) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    write!(out, "\r\x1b[K{}", view.line())?;
    out.flush()
}
