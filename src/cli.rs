//! Command line interface for the `dapbridge` binary.
//!
//! Shared with `build.rs`, which renders the man page from these definitions,
//! so this module depends on nothing but `clap` and `std`.

use std::net::SocketAddr;

use clap::Parser;

/// Command line arguments for the `dapbridge` binary.
#[derive(Debug, Parser)]
#[command(
    name = "dapbridge",
    version,
    about = "Relay a debug adapter's framed stream onto a length-delimited control bus"
)]
pub struct Cli {
    /// Debug adapter stream address.
    #[arg(long, value_name = "ADDR")]
    pub adapter: String,

    /// Address of the subscriber receiving adapter events.
    #[arg(long, value_name = "ADDR")]
    pub publish: String,

    /// Address of the host sending control commands.
    #[arg(long, value_name = "ADDR")]
    pub control: String,

    /// Header token preceding each frame's length field.
    #[arg(long, default_value = "Content-Length:", value_parser = parse_token)]
    pub header: String,

    /// Separator between the length field and the payload. Accepts `\r`,
    /// `\n`, `\t` and `\\` escapes.
    #[arg(long, default_value = r"\r\n\r\n", value_parser = parse_token)]
    pub separator: String,

    /// Bytes requested per adapter read.
    #[arg(long, value_name = "BYTES", default_value_t = 8 * 1024)]
    pub read_capacity: usize,

    /// Reject frames announcing a larger payload.
    #[arg(long, value_name = "BYTES")]
    pub max_payload: Option<usize>,

    /// Serve Prometheus metrics on this address. Ignored when built without
    /// the `metrics` feature.
    #[arg(long, value_name = "ADDR")]
    pub metrics_addr: Option<SocketAddr>,
}

/// Expand backslash escapes and reject empty tokens.
fn parse_token(raw: &str) -> Result<String, String> {
    let mut token = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            token.push(c);
            continue;
        }
        match chars.next() {
            Some('r') => token.push('\r'),
            Some('n') => token.push('\n'),
            Some('t') => token.push('\t'),
            Some('\\') => token.push('\\'),
            Some(other) => return Err(format!("unsupported escape \\{other}")),
            None => return Err("trailing backslash".to_owned()),
        }
    }
    if token.is_empty() {
        return Err("token must not be empty".to_owned());
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rstest::rstest;

    use super::{Cli, parse_token};

    const REQUIRED: [&str; 7] = [
        "dapbridge",
        "--adapter",
        "127.0.0.1:5678",
        "--publish",
        "127.0.0.1:7001",
        "--control",
        "127.0.0.1:7002",
    ];

    #[test]
    fn defaults_match_adapter_wire_format() {
        let cli = Cli::parse_from(REQUIRED);
        assert_eq!(cli.adapter, "127.0.0.1:5678");
        assert_eq!(cli.header, "Content-Length:");
        assert_eq!(cli.separator, "\r\n\r\n");
        assert_eq!(cli.read_capacity, 8192);
        assert_eq!(cli.max_payload, None);
        assert_eq!(cli.metrics_addr, None);
    }

    #[test]
    fn parses_tuning_options() {
        let args = REQUIRED.into_iter().chain([
            "--separator",
            r"\n\n",
            "--max-payload",
            "1024",
            "--read-capacity",
            "512",
        ]);
        let cli = Cli::parse_from(args);
        assert_eq!(cli.separator, "\n\n");
        assert_eq!(cli.max_payload, Some(1024));
        assert_eq!(cli.read_capacity, 512);
    }

    #[test]
    fn endpoints_are_required() {
        assert!(Cli::try_parse_from(["dapbridge", "--adapter", "a:1"]).is_err());
    }

    #[rstest]
    #[case(r"\x")]
    #[case("abc\\")]
    #[case("")]
    fn rejects_bad_tokens(#[case] raw: &str) {
        assert!(parse_token(raw).is_err());
    }
}
