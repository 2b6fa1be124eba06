pub mod completions;
pub mod config;
pub mod plan;
pub mod timer;

use clap::Args;
use roundtimer_core::{Config, TimerConfig};

/// Per-session overrides. Values are taken as typed; anything that is not a
/// positive number falls back to the built-in default.
#[derive(Args, Debug, Default)]
pub struct SessionArgs {
    /// Focus length in minutes
    #[arg(long, value_name = "MIN", allow_hyphen_values = true)]
    focus: Option<String>,
    /// Break length in minutes
    #[arg(long = "break", value_name = "MIN", allow_hyphen_values = true)]
    break_min: Option<String>,
    /// Number of focus/break rounds
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    rounds: Option<String>,
}

impl SessionArgs {
    /// Stored defaults with command-line overrides applied.
    pub fn timer_config(&self, config: &Config) -> TimerConfig {
        let mut timer = config.timer_config();
        if let Some(v) = &self.focus {
            timer.set_focus_duration_min(v);
        }
        if let Some(v) = &self.break_min {
            timer.set_break_duration_min(v);
        }
        if let Some(v) = &self.rounds {
            timer.set_total_rounds(v);
        }
        timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_stored_defaults() {
        let mut config = Config::default();
        config.timer.rounds = 6;
        let args = SessionArgs {
            focus: Some("50".into()),
            break_min: None,
            rounds: None,
        };
        let timer = args.timer_config(&config);
        assert_eq!(timer.focus_duration_min(), 50);
        assert_eq!(timer.break_duration_min(), 5);
        assert_eq!(timer.total_rounds(), 6);
    }

    #[test]
    fn bad_override_uses_builtin_default() {
        let mut config = Config::default();
        config.timer.focus_duration = 45;
        let args = SessionArgs {
            focus: Some("soon".into()),
            ..Default::default()
        };
        assert_eq!(args.timer_config(&config).focus_duration_min(), 25);
    }
}
