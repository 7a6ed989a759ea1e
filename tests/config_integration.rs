use markcraft::config::{ConfigFlags, load_config_flags, parse_flag_tokens, save_config_flags};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".markcraftrc");
    let content = r"
# comment
--show-selection

--image-placeholder https://img.example/a.png
   
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.show_selection);
    assert!(!flags.verbose);
    assert_eq!(
        flags.image_placeholder.as_deref(),
        Some("https://img.example/a.png")
    );
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".markcraftrc");
    std::fs::write(&path, "--show-selection\n--image-placeholder file.png\n").unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "markcraft".to_string(),
        "--image-placeholder=cli.png".to_string(),
        "--verbose".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.show_selection, "file flags should remain enabled");
    assert!(effective.verbose, "cli flags should be applied");
    assert_eq!(
        effective.image_placeholder.as_deref(),
        Some("cli.png"),
        "cli should override the placeholder"
    );
}

#[test]
fn test_file_placeholder_kept_when_cli_is_silent() {
    let file_flags = ConfigFlags {
        image_placeholder: Some("file.png".to_string()),
        ..ConfigFlags::default()
    };
    let effective = file_flags.union(&parse_flag_tokens(&["markcraft".to_string()]));
    assert_eq!(effective.image_placeholder.as_deref(), Some("file.png"));
}

#[test]
fn test_saved_flags_load_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("markcraft").join("config");
    let flags = ConfigFlags {
        show_selection: true,
        ..ConfigFlags::default()
    };
    save_config_flags(&path, &flags).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# markcraft defaults"));
    assert_eq!(load_config_flags(&path).unwrap(), flags);
}
