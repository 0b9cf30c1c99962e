use clap::{Arg, ArgAction, Command};
use srvwatch_core::config::VALID_BACKENDS;

pub fn build_cli() -> Command {
    Command::new("srvwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Live per-server OK/WARN/ERROR counts from status documents in object storage")
        .long_about("srvwatch polls a prefix of an object store (a local directory or an S3 bucket) for JSON status documents, tallies them per server, and redraws the counts on a fixed interval. Fetched data is reused for a short TTL unless the operator forces a refresh.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("watch")
                .about("Poll the source and redraw the dashboard until quit")
                .long_about(
                    "Runs the refresh loop. Each cycle fetches (or reuses) the current batch, tallies it, and redraws.\n\n\
                    While watching (input is read a line at a time):\n\
                    - Enter, or 'r' then Enter, forces a refresh that bypasses the cache\n\
                    - 'q' then Enter quits"
                )
                .args(source_args())
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .short('i')
                        .help("Seconds between refresh cycles (overrides config, default: 10)")
                        .value_parser(clap::value_parser!(u64).range(1..))
                )
                .arg(
                    Arg::new("ttl")
                        .long("ttl")
                        .help("Seconds a fetched batch may be reused (overrides config, default: 60)")
                        .value_parser(clap::value_parser!(u64))
                )
                .arg(tail_arg())
                .arg(
                    Arg::new("cycles")
                        .long("cycles")
                        .short('n')
                        .help("Stop after this many refresh cycles")
                        .value_parser(clap::value_parser!(u64).range(1..))
                )
                .arg(json_arg())
        )
        .subcommand(
            Command::new("snapshot")
                .about("Fetch, tally and print the dashboard once")
                .args(source_args())
                .arg(tail_arg())
                .arg(json_arg())
        )
        .subcommand(
            Command::new("config")
                .about("Print the effective configuration as TOML")
                .args(source_args())
        )
}

fn source_args() -> [Arg; 6] {
    [
        Arg::new("backend")
            .long("backend")
            .help("Storage backend (overrides config, default: local)")
            .value_parser(VALID_BACKENDS),
        Arg::new("root")
            .long("root")
            .short('r')
            .help("Directory to read status documents from (local backend)")
            .conflicts_with("bucket"),
        Arg::new("bucket")
            .long("bucket")
            .short('b')
            .help("Bucket to read status documents from (s3 backend)"),
        Arg::new("region")
            .long("region")
            .help("AWS region for the s3 backend"),
        Arg::new("prefix")
            .long("prefix")
            .short('p')
            .help("Key prefix status documents live under (overrides config, default: raw/)"),
        Arg::new("suffix")
            .long("suffix")
            .help("Key suffix of status documents (overrides config, default: .json)"),
    ]
}

fn tail_arg() -> Arg {
    Arg::new("tail")
        .long("tail")
        .short('t')
        .help("Number of recent raw records to show (overrides config, default: 10)")
        .value_parser(clap::value_parser!(usize))
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output in JSON format")
        .action(ArgAction::SetTrue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build() {
        let app = build_cli();
        assert_eq!(app.get_name(), "srvwatch");
    }

    #[test]
    fn test_cli_watch_command() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec![
            "srvwatch",
            "watch",
            "--root",
            "/var/status",
            "--interval",
            "5",
            "--ttl",
            "30",
            "--cycles",
            "2",
        ]);
        assert!(matches.is_ok());

        let matches = matches.unwrap();
        let watch_matches = matches.subcommand_matches("watch").unwrap();
        assert_eq!(
            watch_matches.get_one::<String>("root").unwrap(),
            "/var/status"
        );
        assert_eq!(*watch_matches.get_one::<u64>("interval").unwrap(), 5);
        assert_eq!(*watch_matches.get_one::<u64>("ttl").unwrap(), 30);
        assert_eq!(*watch_matches.get_one::<u64>("cycles").unwrap(), 2);
        assert!(!watch_matches.get_flag("json"));
    }

    #[test]
    fn test_cli_watch_rejects_zero_interval() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["srvwatch", "watch", "--interval", "0"]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_cli_watch_allows_zero_ttl() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["srvwatch", "watch", "--ttl", "0"]);
        assert!(matches.is_ok());
    }

    #[test]
    fn test_cli_snapshot_json_flag() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec![
            "srvwatch", "snapshot", "--bucket", "ops", "--prefix", "daily/", "--json",
        ]);
        assert!(matches.is_ok());

        let matches = matches.unwrap();
        let snapshot_matches = matches.subcommand_matches("snapshot").unwrap();
        assert_eq!(snapshot_matches.get_one::<String>("bucket").unwrap(), "ops");
        assert_eq!(
            snapshot_matches.get_one::<String>("prefix").unwrap(),
            "daily/"
        );
        assert!(snapshot_matches.get_flag("json"));
    }

    #[test]
    fn test_cli_root_conflicts_with_bucket() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec![
            "srvwatch", "snapshot", "--root", ".", "--bucket", "ops",
        ]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_cli_invalid_backend() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["srvwatch", "snapshot", "--backend", "gcs"]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_cli_verbose_is_global() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["srvwatch", "config", "-v"]);
        assert!(matches.is_ok());
        assert!(matches.unwrap().get_flag("verbose"));
    }

    #[test]
    fn test_cli_watch_help_describes_line_input() {
        let mut app = build_cli();
        let watch = app.find_subcommand_mut("watch").unwrap();
        let help = watch.render_long_help().to_string();
        assert!(help.contains("'q' then Enter quits"));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["srvwatch"]);
        assert!(matches.is_err());
    }
}
