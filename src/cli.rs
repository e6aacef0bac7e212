//! Command-line front end.
//!
//! ```text
//! seidan gen <name> <key> [expiration]
//! seidan kid
//! ```
//!
//! Tokens and key identifiers go to stdout; diagnostics go through `tracing`.

use std::ffi::OsString;
use std::io::Write;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use seidan_hsm::{SecurityModule, SoftwareModule};

use crate::config::{ClusterName, Config};
use crate::error::IssueError;
use crate::host_key::HostKey;
use crate::issuer::Issuer;
use crate::resolver::resolve_signing_key;

const FALLBACK_PROGRAM: &str = "seidan";

/// Seidan cluster membership token issuer
#[derive(Debug, Parser, PartialEq, Eq)]
#[command(name = "seidan", version, about)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands.
#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Issue a membership token for a host key
    Gen {
        /// Human-readable host name
        #[arg(allow_hyphen_values = true)]
        name: String,

        /// Host public key: base64url (unpadded) DER SubjectPublicKeyInfo
        key: String,

        /// Validity in days; 0 or absent for no expiration
        #[arg(value_parser = parse_expiration)]
        expiration: Option<u32>,
    },

    /// Print the key identifier of the cluster signing key
    Kid,
}

/// Parses an expiration argument as a whole number of days.
///
/// # Errors
///
/// Returns `IssueError::InvalidExpiration` for anything other than a
/// non-negative integer that fits in a `u32`.
pub fn parse_expiration(input: &str) -> Result<u32, IssueError> {
    input.parse().map_err(|_| IssueError::InvalidExpiration {
        input: input.to_string(),
    })
}

/// Parses command-line arguments, including the program name.
///
/// Subcommand names are matched case-insensitively.
///
/// # Errors
///
/// Returns the clap error for malformed arguments, help, and version
/// requests.
pub fn parse_args(args: &[OsString]) -> Result<Cli, clap::Error> {
    let normalized = args.iter().enumerate().map(|(i, arg)| {
        match arg.to_str() {
            Some(s) if i == 1 && !s.starts_with('-') => OsString::from(s.to_lowercase()),
            _ => arg.clone(),
        }
    });
    Cli::try_parse_from(normalized)
}

/// Runs the program and returns its exit status.
///
/// The software key store is only opened once the arguments are known to be
/// valid.
pub fn run<I, T>(args: I, config: &Config, out: &mut dyn Write) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let program = args
        .first()
        .map_or_else(|| FALLBACK_PROGRAM.to_string(), |p| p.to_string_lossy().into_owned());

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(err) => return report_parse_error(&err, &program, out),
    };

    let Some(command) = cli.command else {
        return emit(out, &format!("Usage: {program} command"), 0);
    };

    let module = match SoftwareModule::open(&config.keystore) {
        Ok(module) => module,
        Err(e) => {
            let err = IssueError::ModuleInit {
                reason: e.to_string(),
            };
            tracing::error!("{err}");
            return 1;
        }
    };

    match execute(&command, &module, &config.cluster) {
        Ok(line) => emit(out, &line, 0),
        Err(e) => {
            tracing::error!("{e}");
            1
        }
    }
}

/// Executes `command` against `module` and returns the line to print.
///
/// For `gen` the steps run in a fixed order: resolve the signing key, then
/// validate the host key, then sign. Nothing is signed unless every earlier
/// step succeeded.
///
/// # Errors
///
/// Returns the first `IssueError` encountered.
pub fn execute(
    command: &Command,
    module: &dyn SecurityModule,
    cluster: &ClusterName,
) -> Result<String, IssueError> {
    let key = resolve_signing_key(module, cluster)?;

    match command {
        Command::Gen {
            name,
            key: encoded,
            expiration,
        } => {
            let host_key = HostKey::parse(encoded)?;
            let issuer = Issuer::new(cluster.clone(), key)?;
            issuer.issue(name, &host_key, expiration.unwrap_or(0))
        }
        Command::Kid => {
            let issuer = Issuer::new(cluster.clone(), key)?;
            tracing::info!(alg = %issuer.algorithm(), "cluster signing key");
            Ok(issuer.key_id().to_string())
        }
    }
}

fn report_parse_error(err: &clap::Error, program: &str, out: &mut dyn Write) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => write_out(out, &err.to_string(), 0),
        ErrorKind::MissingRequiredArgument => {
            emit(out, &format!("Usage: {program} gen name key [expiration]"), 1)
        }
        ErrorKind::InvalidSubcommand => {
            tracing::error!("no valid command provided");
            1
        }
        _ => {
            let rendered = err.to_string();
            let first = rendered.lines().next().unwrap_or_default();
            tracing::error!("{}", first.trim_start_matches("error: "));
            1
        }
    }
}

fn emit(out: &mut dyn Write, line: &str, status: u8) -> u8 {
    write_out(out, &format!("{line}\n"), status)
}

fn write_out(out: &mut dyn Write, text: &str, status: u8) -> u8 {
    match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        Ok(()) => status,
        Err(e) => {
            tracing::error!(error = %e, "failed to write output");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use seidan_hsm::testutil;
    use seidan_hsm::{KeyFamily, MemoryModule};

    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    fn module_with_key(family: KeyFamily) -> MemoryModule {
        let mut module = MemoryModule::new();
        module.insert("seidan:test", testutil::generate_key("seidan:test/primary", family));
        module
    }

    fn host_key() -> String {
        testutil::encode_host_key(&testutil::generate_public_key(KeyFamily::Ed25519))
    }

    fn run_captured(list: &[&str], config: &Config) -> (u8, String) {
        let mut out = Vec::new();
        let status = run(args(list), config, &mut out);
        (status, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parses_gen_with_expiration() {
        let cli = parse_args(&args(&["seidan", "gen", "host1", "KEY", "30"])).unwrap();

        assert_eq!(
            cli.command,
            Some(Command::Gen {
                name: "host1".into(),
                key: "KEY".into(),
                expiration: Some(30),
            })
        );
    }

    #[test]
    fn subcommand_is_case_insensitive() {
        let cli = parse_args(&args(&["seidan", "GEN", "host1", "KEY"])).unwrap();

        assert!(matches!(cli.command, Some(Command::Gen { expiration: None, .. })));

        let cli = parse_args(&args(&["seidan", "Kid"])).unwrap();
        assert_eq!(cli.command, Some(Command::Kid));
    }

    #[test]
    fn name_may_start_with_hyphen() {
        let cli = parse_args(&args(&["seidan", "gen", "-edge1", "KEY", "7"])).unwrap();

        assert_eq!(
            cli.command,
            Some(Command::Gen {
                name: "-edge1".into(),
                key: "KEY".into(),
                expiration: Some(7),
            })
        );
    }

    #[test]
    fn positional_values_keep_their_case() {
        let cli = parse_args(&args(&["seidan", "gen", "Host1", "AbC"])).unwrap();

        assert!(matches!(
            cli.command,
            Some(Command::Gen { ref name, ref key, .. }) if name == "Host1" && key == "AbC"
        ));
    }

    #[test]
    fn rejects_malformed_expiration() {
        for bad in ["abc", "1.5", "99999999999"] {
            let err = parse_args(&args(&["seidan", "gen", "host1", "KEY", bad])).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "input {bad}");
        }
    }

    #[test]
    fn parse_expiration_reports_input() {
        assert_eq!(parse_expiration("0"), Ok(0));
        assert_eq!(
            parse_expiration("-1"),
            Err(IssueError::InvalidExpiration { input: "-1".into() })
        );
    }

    #[test]
    fn no_subcommand_prints_usage() {
        let (status, stdout) = run_captured(&["seidan"], &Config::default());

        assert_eq!(status, 0);
        assert_eq!(stdout, "Usage: seidan command\n");
    }

    #[test]
    fn missing_arguments_print_gen_usage() {
        let (status, stdout) = run_captured(&["./seidan", "gen", "host1"], &Config::default());

        assert_eq!(status, 1);
        assert_eq!(stdout, "Usage: ./seidan gen name key [expiration]\n");
    }

    #[test]
    fn unknown_subcommand_fails() {
        let (status, stdout) = run_captured(&["seidan", "frobnicate"], &Config::default());

        assert_eq!(status, 1);
        assert!(stdout.is_empty());
    }

    #[test]
    fn help_exits_successfully() {
        let (status, stdout) = run_captured(&["seidan", "--help"], &Config::default());

        assert_eq!(status, 0);
        assert!(stdout.contains("gen"));
    }

    #[test]
    fn help_write_failure_is_reported() {
        struct ClosedPipe;

        impl Write for ClosedPipe {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let status = run(args(&["seidan", "--help"]), &Config::default(), &mut ClosedPipe);

        assert_eq!(status, 1);
    }

    #[test]
    fn missing_keystore_fails_before_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default().with_keystore(dir.path().join("absent"));

        let (status, stdout) = run_captured(&["seidan", "gen", "host1", &host_key()], &config);

        assert_eq!(status, 1);
        assert!(stdout.is_empty());
    }

    #[test]
    fn gen_returns_token() {
        let module = module_with_key(KeyFamily::EcP256);
        let command = Command::Gen {
            name: "host1".into(),
            key: host_key(),
            expiration: Some(30),
        };

        let token = execute(&command, &module, &ClusterName::new("test")).unwrap();

        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn gen_without_keys_fails() {
        let command = Command::Gen {
            name: "host1".into(),
            key: host_key(),
            expiration: None,
        };

        let result = execute(&command, &MemoryModule::new(), &ClusterName::new("test"));

        assert!(matches!(result, Err(IssueError::NoKeys { .. })));
    }

    #[test]
    fn gen_rejects_bad_host_key() {
        let module = module_with_key(KeyFamily::Ed25519);
        let command = Command::Gen {
            name: "host1".into(),
            key: "!!!".into(),
            expiration: None,
        };

        let result = execute(&command, &module, &ClusterName::new("test"));

        assert!(matches!(
            result,
            Err(IssueError::InvalidHostKeyEncoding { .. })
        ));
    }

    #[test]
    fn kid_matches_issuer_key_id() {
        let module = module_with_key(KeyFamily::Ed25519);
        let cluster = ClusterName::new("test");

        let kid = execute(&Command::Kid, &module, &cluster).unwrap();

        let key = resolve_signing_key(&module, &cluster).unwrap();
        let issuer = Issuer::new(cluster, key).unwrap();
        assert_eq!(kid, issuer.key_id());
    }
}
