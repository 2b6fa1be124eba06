use roundtimer_core::timer::format_mmss;
use roundtimer_core::Config;
use serde_json::json;

use super::SessionArgs;

/// Phases shown before the listing is cut short.
pub const MAX_LISTED: usize = 40;

pub fn run(args: SessionArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let timer = args.timer_config(&config);
    let total_phases = timer.phase_count();

    if json {
        let phases: Vec<_> = timer.plan().take(MAX_LISTED).collect();
        let out = json!({
            "config": timer,
            "phases": phases,
            "total_phases": total_phases,
            "total_duration_min": timer.total_duration_min(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for step in timer.plan().take(MAX_LISTED) {
        println!(
            "{:<6} #{:<3} {}",
            step.phase.label(),
            step.round,
            format_mmss(step.duration_secs())
        );
    }
    let hidden = total_phases.saturating_sub(MAX_LISTED as u64);
    if hidden > 0 {
        println!("... {hidden} more phases");
    }
    println!(
        "total {} min over {} rounds",
        timer.total_duration_min(),
        timer.total_rounds()
    );
    Ok(())
}
