use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["listas"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn run_defaults_to_all_providers_today() {
    let cli = Cli::try_parse_from(["listas", "run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Run {
            provider: None,
            date: None,
            dry_run: false
        })
    ));
}

#[test]
fn run_with_provider_date_and_dry_run() {
    let cli = Cli::try_parse_from([
        "listas",
        "run",
        "--provider",
        "gcgroup",
        "--date",
        "2026-10-14",
        "--dry-run",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Run {
            provider: Some(ref p),
            date: Some(d),
            dry_run: true
        }) if p == "gcgroup" && d == NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    ));
}

#[test]
fn run_rejects_bad_date() {
    assert!(Cli::try_parse_from(["listas", "run", "--date", "14/10/2026"]).is_err());
}

#[test]
fn parse_requires_a_file() {
    assert!(Cli::try_parse_from(["listas", "parse"]).is_err());

    let cli = Cli::try_parse_from(["listas", "parse", "lista.txt", "--provider", "Kadabra Provee"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Parse {
            ref file,
            provider: Some(ref p)
        }) if file == &PathBuf::from("lista.txt") && p == "Kadabra Provee"
    ));
}

#[test]
fn broadcast_and_audit_accept_a_date() {
    let cli = Cli::try_parse_from(["listas", "broadcast", "--date", "2026-10-14"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Broadcast { date: Some(_) })));

    let cli = Cli::try_parse_from(["listas", "audit"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Audit { date: None })));
}

#[test]
fn parses_providers_command() {
    let cli = Cli::try_parse_from(["listas", "providers"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Providers)));
}

#[test]
fn unknown_command_is_an_error() {
    assert!(Cli::try_parse_from(["listas", "collect"]).is_err());
}
