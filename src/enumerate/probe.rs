use tracing::debug;

use crate::enumerate::error::ProbeError;
use crate::enumerate::options::EnumOptions;
use crate::enumerate::session::SmtpSession;

/// Run `MAIL FROM` / `RCPT TO` for `candidate` and return the raw reply to
/// `RCPT TO`. The `MAIL FROM` reply only opens the transaction and is
/// discarded.
pub fn probe_candidate(
    session: &mut SmtpSession,
    candidate: &str,
    options: &EnumOptions,
) -> Result<String, ProbeError> {
    let mail_reply = session
        .transact(&options.mail_from_command())
        .map_err(|err| ProbeError::new(candidate, err))?;
    debug!(candidate, reply = %mail_reply.trim_end(), "MAIL FROM reply discarded");

    session
        .transact(&EnumOptions::rcpt_to_command(candidate))
        .map_err(|err| ProbeError::new(candidate, err))
}
