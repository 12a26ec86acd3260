use super::*;

fn parse_args(argv: &[&str]) -> Args {
    Args::try_parse_from(argv)
        .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
}

#[test]
fn no_subcommand_means_chat() {
    let args = parse_args(&["rex"]);
    assert!(args.command.is_none());
    assert!(args.base_url.is_none());
}

#[test]
fn global_flags_work_after_subcommands() {
    let args = parse_args(&["rex", "admin", "--base-url", "http://rex.local:5000"]);
    assert!(matches!(args.command, Some(Commands::Admin)));
    assert_eq!(args.base_url.as_deref(), Some("http://rex.local:5000"));

    let args = parse_args(&["rex", "chat", "-l", "chat.log", "--trace-file", "/tmp/rex.trace"]);
    assert_eq!(args.log.as_deref(), Some("chat.log"));
    assert_eq!(
        args.trace_file.as_deref(),
        Some(std::path::Path::new("/tmp/rex.trace"))
    );
}

#[test]
fn set_collects_multi_word_values() {
    let args = parse_args(&["rex", "set", "username", "Mohsin", "Raja"]);
    match args.command {
        Some(Commands::Set { key, value }) => {
            assert_eq!(key.as_deref(), Some("username"));
            assert_eq!(value, vec!["Mohsin", "Raja"]);
        }
        _ => panic!("expected set subcommand"),
    }
}

#[test]
fn bare_set_prints_configuration() {
    let args = parse_args(&["rex", "set"]);
    assert!(matches!(
        args.command,
        Some(Commands::Set { key: None, ref value }) if value.is_empty()
    ));
}

#[test]
fn unset_requires_a_key() {
    assert!(Args::try_parse_from(["rex", "unset"]).is_err());
    let args = parse_args(&["rex", "unset", "base-url"]);
    assert!(matches!(args.command, Some(Commands::Unset { ref key }) if key == "base-url"));
}
