use std::time::Duration;

/// How the reply to a command is read off the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyMode {
    /// One `read` call (at most [`EnumOptions::max_read`] bytes) is one reply.
    #[default]
    SingleRead,
    /// Assemble continuation lines (`250-...`) until the final `250 ...` line.
    Multiline,
}

/// How a `RCPT TO` reply is mapped to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifyMode {
    /// Look for `250` then `550` anywhere in the reply text.
    #[default]
    Substring,
    /// Parse the three-digit code leading the final reply line.
    Strict,
}

/// Configuration knobs for [`Enumerator`](crate::enumerate::Enumerator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumOptions {
    pub port: u16,
    pub mail_from: String,
    /// Pause observed after every candidate once its session is closed.
    pub delay: Duration,
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    pub max_read: usize,
    pub reply_mode: ReplyMode,
    pub classify_mode: ClassifyMode,
}

impl Default for EnumOptions {
    fn default() -> Self {
        Self {
            port: 25,
            mail_from: "test@example.com".to_string(),
            delay: Duration::from_secs(1),
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
            max_read: 1024,
            reply_mode: ReplyMode::SingleRead,
            classify_mode: ClassifyMode::Substring,
        }
    }
}

impl EnumOptions {
    /// Convert a millisecond count to a timeout. Zero disables the deadline.
    pub fn timeout_from_ms(ms: u64) -> Option<Duration> {
        if ms == 0 {
            None
        } else {
            Some(Duration::from_millis(ms))
        }
    }

    pub fn mail_from_command(&self) -> String {
        format!("MAIL FROM:<{}>", self.mail_from)
    }

    pub fn rcpt_to_command(candidate: &str) -> String {
        format!("RCPT TO:<{candidate}>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_baseline_behaviour() {
        let options = EnumOptions::default();
        assert_eq!(options.port, 25);
        assert_eq!(options.delay, Duration::from_secs(1));
        assert_eq!(options.connect_timeout, None);
        assert_eq!(options.reply_mode, ReplyMode::SingleRead);
        assert_eq!(options.classify_mode, ClassifyMode::Substring);
        assert_eq!(options.mail_from_command(), "MAIL FROM:<test@example.com>");
    }

    #[test]
    fn zero_timeout_disables_deadline() {
        assert_eq!(EnumOptions::timeout_from_ms(0), None);
        assert_eq!(
            EnumOptions::timeout_from_ms(1500),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn rcpt_to_wraps_candidate_verbatim() {
        assert_eq!(EnumOptions::rcpt_to_command("alice"), "RCPT TO:<alice>");
    }
}
