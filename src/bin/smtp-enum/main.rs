use std::io::Write;

use anyhow::{Context, Result};
use smtp_enum::{EnumError, Enumerator, load_candidates};
use tracing_subscriber::EnvFilter;

mod args;
mod output;

use args::Cli;
use output::{ConsoleReporter, OutputFormat};

// codes de sortie : 0 terminé (échecs de sonde inclus), 1 cible injoignable
const EXIT_OK: i32 = 0;
const EXIT_UNREACHABLE: i32 = 1;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let code = run(&cli, std::io::stdout().lock(), std::io::stderr().lock())?;
    if code != EXIT_OK {
        std::process::exit(code);
    }
    Ok(())
}

/// Run the enumeration described by `cli` and return the process exit code.
fn run<W: Write, E: Write>(cli: &Cli, out: W, mut err: E) -> Result<i32> {
    let options = cli.options()?;
    let format = OutputFormat::parse(&cli.format)?;
    let candidates = load_candidates(&cli.wordlist)
        .with_context(|| format!("load wordlist {}", cli.wordlist.display()))?;

    let enumerator = Enumerator::new(cli.target.as_str(), options);
    let mut reporter = ConsoleReporter::new(format, out);

    match enumerator.run(&candidates, &mut reporter) {
        Ok(summary) => {
            reporter.finish(&summary)?;
            Ok(EXIT_OK)
        }
        Err(EnumError::Connection(cause)) => {
            reporter.flush()?;
            writeln!(err, "Unable to connect to SMTP server: {cause}. Exiting.")?;
            Ok(EXIT_UNREACHABLE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::thread;

    fn wordlist(lines: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(lines.as_bytes()).expect("write");
        file
    }

    fn cli(port: u16, list: &tempfile::NamedTempFile) -> Cli {
        let port = port.to_string();
        let path = list.path().to_str().expect("utf-8 path").to_string();
        Cli::try_parse_from([
            "smtp-enum",
            "127.0.0.1",
            path.as_str(),
            "--port",
            port.as_str(),
            "--delay-ms",
            "0",
            "--read-timeout-ms",
            "5000",
        ])
        .expect("parse")
    }

    #[test]
    fn refused_target_is_fatal_with_exit_one() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let list = wordlist("alice\nbob\n");
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(&cli(port, &list), &mut out, &mut err).expect("run");

        assert_eq!(code, EXIT_UNREACHABLE);
        assert!(out.is_empty(), "no verdicts expected: {out:?}");
        let err = String::from_utf8(err).expect("utf8");
        assert!(err.starts_with("Unable to connect to SMTP server: "));
        assert!(err.trim_end().ends_with("Exiting."));
    }

    #[test]
    fn completed_run_exits_zero_and_prints_completion() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let port = listener.local_addr().expect("addr").port();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone"));
            stream.write_all(b"220 mock ESMTP\r\n").expect("banner");
            for reply in [&b"250 2.1.0 Ok\r\n"[..], &b"250 2.1.5 OK\r\n"[..]] {
                let mut line = String::new();
                reader.read_line(&mut line).expect("command");
                stream.write_all(reply).expect("reply");
            }
            let mut line = String::new();
            let _ = reader.read_line(&mut line);
        });

        let list = wordlist("\nalice\n   \n");
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(&cli(port, &list), &mut out, &mut err).expect("run");
        server.join().expect("server thread");

        assert_eq!(code, EXIT_OK);
        assert!(err.is_empty());
        insta::assert_snapshot!(String::from_utf8(out).expect("utf8"), @r"
        Connected to SMTP server: 220 mock ESMTP
        Checking user: alice - Response: 250 2.1.5 OK
        User exists: alice
        Search finished!
        ");
    }

    #[test]
    fn missing_wordlist_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.txt");
        let cli = Cli::try_parse_from(["smtp-enum", "127.0.0.1", path.to_str().expect("utf-8")])
            .expect("parse");
        let err = run(&cli, Vec::new(), Vec::new()).expect_err("missing wordlist");
        assert!(format!("{err:#}").contains("absent.txt"));
    }
}
