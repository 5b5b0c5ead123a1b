use crate::enumerate::options::ClassifyMode;
use crate::enumerate::types::Verdict;

/// Map a raw `RCPT TO` reply to a verdict.
///
/// [`ClassifyMode::Substring`] looks for `250` anywhere in the text, then
/// `550`. It does not parse the reply grammar, so a reply that merely
/// mentions one of those numbers is classified by it.
pub fn classify_reply(reply: &str, mode: ClassifyMode) -> Verdict {
    match mode {
        ClassifyMode::Substring => classify_substring(reply),
        ClassifyMode::Strict => classify_strict(reply),
    }
}

fn classify_substring(reply: &str) -> Verdict {
    if reply.contains("250") {
        Verdict::Exists
    } else if reply.contains("550") {
        Verdict::DoesNotExist
    } else {
        Verdict::Unknown
    }
}

fn classify_strict(reply: &str) -> Verdict {
    let Some(code) = final_status_code(reply) else {
        return Verdict::Unknown;
    };
    match code {
        250 | 251 => Verdict::Exists,
        550 | 551 | 553 => Verdict::DoesNotExist,
        _ => Verdict::Unknown,
    }
}

/// Status code of the last non-empty line, if it starts with three digits
/// followed by a space, a hyphen or nothing.
fn final_status_code(reply: &str) -> Option<u16> {
    let line = reply.lines().rev().find(|line| !line.trim().is_empty())?;
    let line = line.trim_start();
    let digits = line.get(..3)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match line.as_bytes().get(3) {
        None | Some(b' ') | Some(b'-') | Some(b'\r') => digits.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn substring(reply: &str) -> Verdict {
        classify_reply(reply, ClassifyMode::Substring)
    }

    fn strict(reply: &str) -> Verdict {
        classify_reply(reply, ClassifyMode::Strict)
    }

    #[test]
    fn accepted_recipient_exists() {
        assert_eq!(substring("250 2.1.5 Ok\r\n"), Verdict::Exists);
    }

    #[test]
    fn rejected_recipient_does_not_exist() {
        assert_eq!(
            substring("550 5.1.1 <bob>: Recipient address rejected\r\n"),
            Verdict::DoesNotExist
        );
    }

    #[test]
    fn acceptance_marker_wins_over_rejection() {
        assert_eq!(substring("550 ref 250 queued\r\n"), Verdict::Exists);
    }

    #[test]
    fn other_codes_are_unknown() {
        assert_eq!(substring("252 Cannot VRFY user\r\n"), Verdict::Unknown);
        assert_eq!(substring("451 4.7.1 Try again later\r\n"), Verdict::Unknown);
        assert_eq!(substring(""), Verdict::Unknown);
    }

    #[test]
    fn substring_match_is_loose() {
        assert_eq!(substring("554 ticket #12500 denied"), Verdict::Exists);
        assert_eq!(substring("421 id 95501 closing"), Verdict::DoesNotExist);
    }

    #[test]
    fn strict_reads_leading_code_only() {
        assert_eq!(strict("554 ticket #12500 denied"), Verdict::Unknown);
        assert_eq!(strict("251 User not local; will forward"), Verdict::Exists);
        assert_eq!(strict("553 mailbox name not allowed"), Verdict::DoesNotExist);
        assert_eq!(strict("2500 weird"), Verdict::Unknown);
        assert_eq!(strict("no code here"), Verdict::Unknown);
    }

    #[test]
    fn strict_uses_final_line_of_multiline_reply() {
        let reply = "550-first line\n550 5.1.1 No such user";
        assert_eq!(strict(reply), Verdict::DoesNotExist);
        assert_eq!(strict("250 OK\r\n\r\n"), Verdict::Exists);
    }

    fn without_markers() -> impl Strategy<Value = String> {
        "[ -~]{0,64}".prop_filter("no markers", |s| !s.contains("250") && !s.contains("550"))
    }

    proptest! {
        #[test]
        fn contains_250_without_550_exists(prefix in without_markers(), suffix in without_markers()) {
            let reply = format!("{prefix}250{suffix}");
            prop_assume!(!reply.contains("550"));
            prop_assert_eq!(substring(&reply), Verdict::Exists);
        }

        #[test]
        fn contains_550_without_250_does_not_exist(prefix in without_markers(), suffix in without_markers()) {
            let reply = format!("{prefix}550{suffix}");
            prop_assume!(!reply.contains("250"));
            prop_assert_eq!(substring(&reply), Verdict::DoesNotExist);
        }

        #[test]
        fn both_markers_prefer_exists(a in without_markers(), b in without_markers(), rejection_first in any::<bool>()) {
            let reply = if rejection_first {
                format!("{a}550{b}250")
            } else {
                format!("{a}250{b}550")
            };
            prop_assert_eq!(substring(&reply), Verdict::Exists);
        }

        #[test]
        fn neither_marker_is_unknown(reply in without_markers()) {
            prop_assert_eq!(substring(&reply), Verdict::Unknown);
        }
    }
}
