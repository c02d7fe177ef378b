use super::*;

#[test]
fn parses_parse_command() {
    let cli = Cli::try_parse_from(["misima-cli", "parse", "Collection- Maria, Format- Robusto"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Parse { ref description } if description.starts_with("Collection- Maria")
    ));
}

#[test]
fn parse_requires_a_description() {
    assert!(Cli::try_parse_from(["misima-cli", "parse"]).is_err());
}

#[test]
fn audit_defaults() {
    let cli = Cli::try_parse_from(["misima-cli", "audit"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Audit {
            collection: None,
            json: false
        }
    ));
}

#[test]
fn audit_with_collection_and_json() {
    let cli = Cli::try_parse_from(["misima-cli", "audit", "--collection", "cigars", "--json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Audit { collection: Some(ref c), json: true } if c == "cigars"
    ));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["misima-cli"]).is_err());
}
