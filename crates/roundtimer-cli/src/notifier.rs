//! Terminal notification sink.

use std::io::Write;

use roundtimer_core::{Notification, NotificationKind, Notifier};

/// Prints notifications to stderr above the status line.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    bell: bool,
}

impl TerminalNotifier {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }

    fn format(&self, n: &Notification) -> String {
        let marker = match n.kind {
            NotificationKind::Transient => ">",
            NotificationKind::Success => "+",
            NotificationKind::Failure => "x",
        };
        let mut line = format!("{marker} {}", n.title);
        if let Some(message) = &n.message {
            line.push_str(&format!(" ({message})"));
        }
        if self.bell && n.kind != NotificationKind::Transient {
            line.push('\x07');
        }
        line
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let line = self.format(&notification);
        // A closed stderr must not disturb the session.
        let _ = writeln!(std::io::stderr().lock(), "\r\x1b[K{line}");
    }
}
