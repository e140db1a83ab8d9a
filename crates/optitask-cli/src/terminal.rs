use std::io::{IsTerminal, Write};

use optitask_core::notify::{Notifier, NotifyKind, NotifyOptions};

/// Prints notices to stdout with a coloured prefix.
///
/// Sound is rendered as the terminal bell.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    color: bool,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self {
            color: std::io::stdout().is_terminal(),
        }
    }
}

pub fn prefix(kind: NotifyKind, color: bool) -> String {
    let (label, code) = match kind {
        NotifyKind::Success => ("ok", "32"),
        NotifyKind::Error => ("error", "31"),
        NotifyKind::Info => ("info", "36"),
        NotifyKind::Warning => ("warn", "33"),
    };
    if color {
        format!("\x1b[{code}m[{label}]\x1b[0m")
    } else {
        format!("[{label}]")
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, options: NotifyOptions) {
        let bell = if options.sound { "\x07" } else { "" };
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{bell}{} {message}", prefix(options.kind, self.color));
        let _ = out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_prefixes() {
        assert_eq!(prefix(NotifyKind::Success, false), "[ok]");
        assert_eq!(prefix(NotifyKind::Warning, false), "[warn]");
    }

    #[test]
    fn coloured_prefix_wraps_label() {
        assert_eq!(prefix(NotifyKind::Error, true), "\x1b[31m[error]\x1b[0m");
    }
}
