use anyhow::{Result, bail};
use clap::Parser;
use smtp_enum::{ClassifyMode, EnumOptions, ReplyMode};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "smtp-enum",
    about = "Probe an SMTP server for valid recipients with MAIL FROM / RCPT TO",
    after_help = "Example: smtp-enum 192.168.1.108 usernames.txt"
)]
pub struct Cli {
    /// target IP address or hostname
    pub target: String,

    /// username wordlist, one candidate per line
    pub wordlist: PathBuf,

    /// SMTP port
    #[arg(long, default_value_t = 25)]
    pub port: u16,

    /// envelope sender used for MAIL FROM
    #[arg(long = "from", default_value = "test@example.com")]
    pub mail_from: String,

    /// pause between candidates (ms)
    #[arg(long = "delay-ms", default_value_t = 1_000)]
    pub delay_ms: u64,

    /// connect timeout (ms), 0 disables
    #[arg(long = "connect-timeout-ms", default_value_t = 0)]
    pub connect_timeout_ms: u64,

    /// read/write timeout per reply (ms), 0 disables
    #[arg(long = "read-timeout-ms", default_value_t = 0)]
    pub read_timeout_ms: u64,

    /// classify on the leading reply code instead of a substring match
    #[arg(long)]
    pub strict: bool,

    /// assemble multi-line replies instead of a single read
    #[arg(long)]
    pub multiline: bool,

    /// format: human|ndjson|csv
    #[arg(long, default_value = "human")]
    pub format: String,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn options(&self) -> Result<EnumOptions> {
        if self.mail_from.contains(['<', '>', '\r', '\n']) {
            bail!("--from must be a bare address, got '{}'", self.mail_from);
        }
        let io_timeout = EnumOptions::timeout_from_ms(self.read_timeout_ms);
        Ok(EnumOptions {
            port: self.port,
            mail_from: self.mail_from.clone(),
            delay: Duration::from_millis(self.delay_ms),
            connect_timeout: EnumOptions::timeout_from_ms(self.connect_timeout_ms),
            read_timeout: io_timeout,
            write_timeout: io_timeout,
            reply_mode: if self.multiline {
                ReplyMode::Multiline
            } else {
                ReplyMode::SingleRead
            },
            classify_mode: if self.strict {
                ClassifyMode::Strict
            } else {
                ClassifyMode::Substring
            },
            ..EnumOptions::default()
        })
    }
}
