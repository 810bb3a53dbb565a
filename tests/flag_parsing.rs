//! Integration tests for grouped flag registration, parsing and help

mod common;

use common::{base_command, clean_env, strings};
use serial_test::serial;
use std::time::Duration;
use vault_cli::command::FlagSetBit;
use vault_cli::flags::{StringVar, Target, MAX_LINE_LENGTH};

#[test]
#[serial]
fn test_static_defaults_without_environment() {
    temp_env::with_vars(clean_env(&[]), || {
        let (cmd, _) = base_command();
        let flags = cmd
            .flag_set(FlagSetBit::HTTP | FlagSetBit::OUTPUT_FORMAT)
            .unwrap();
        flags.parse(&[]).unwrap();

        assert_eq!(cmd.address(), "https://127.0.0.1:8200");
        assert_eq!(cmd.format(), "table");
        assert_eq!(cmd.wrap_ttl(), Duration::ZERO);
        assert!(!cmd.http_flags().tls_skip_verify);
    });
}

#[test]
#[serial]
fn test_environment_overrides_default_and_flag_overrides_environment() {
    let env = clean_env(&[("VAULT_ADDR", "https://env.example.com:8200")]);
    temp_env::with_vars(env, || {
        let (cmd, _) = base_command();
        let flags = cmd.flag_set(FlagSetBit::HTTP).unwrap();

        // Seeded at registration, before any parse.
        assert_eq!(cmd.address(), "https://env.example.com:8200");

        flags.parse(&[]).unwrap();
        assert_eq!(cmd.address(), "https://env.example.com:8200");

        flags
            .parse(&strings(&["-address", "https://flag.example.com:8200"]))
            .unwrap();
        assert_eq!(cmd.address(), "https://flag.example.com:8200");
    });
}

#[test]
#[serial]
fn test_typed_environment_values() {
    let env = clean_env(&[("VAULT_SKIP_VERIFY", "true"), ("VAULT_WRAP_TTL", "90s")]);
    temp_env::with_vars(env, || {
        let (cmd, _) = base_command();
        cmd.flag_set(FlagSetBit::HTTP).unwrap();

        let http = cmd.http_flags();
        assert!(http.tls_skip_verify);
        assert_eq!(http.wrap_ttl, Duration::from_secs(90));
    });
}

#[test]
#[serial]
fn test_malformed_environment_value_keeps_default() {
    let env = clean_env(&[("VAULT_WRAP_TTL", "soon"), ("VAULT_SKIP_VERIFY", "maybe")]);
    temp_env::with_vars(env, || {
        let (cmd, _) = base_command();
        cmd.flag_set(FlagSetBit::HTTP).unwrap();

        assert_eq!(cmd.wrap_ttl(), Duration::ZERO);
        assert!(!cmd.http_flags().tls_skip_verify);
    });
}

#[test]
#[serial]
fn test_malformed_duration_flag_is_parse_error() {
    temp_env::with_vars(clean_env(&[]), || {
        let (cmd, ui) = base_command();
        let flags = cmd.flag_set(FlagSetBit::HTTP).unwrap();

        assert!(flags.parse(&strings(&["-wrap-ttl=forever"])).is_err());
        flags.close();

        assert_eq!(cmd.wrap_ttl(), Duration::ZERO);
        let errors = ui.error_lines().join("\n");
        assert!(errors.contains("wrap-ttl"), "{}", errors);
    });
}

#[test]
#[serial]
fn test_bool_flag_forms() {
    temp_env::with_vars(clean_env(&[]), || {
        let (cmd, _) = base_command();
        let flags = cmd.flag_set(FlagSetBit::HTTP).unwrap();

        flags.parse(&strings(&["-tls-skip-verify"])).unwrap();
        assert!(cmd.http_flags().tls_skip_verify);

        flags.parse(&strings(&["-tls-skip-verify=false"])).unwrap();
        assert!(!cmd.http_flags().tls_skip_verify);
    });
}

#[test]
#[serial]
fn test_positional_arguments_are_kept() {
    temp_env::with_vars(clean_env(&[]), || {
        let (cmd, _) = base_command();
        let flags = cmd.flag_set(FlagSetBit::HTTP).unwrap();

        flags
            .parse(&strings(&["-wrap-ttl=5m", "secret/foo", "-address=ignored"]))
            .unwrap();
        assert_eq!(cmd.wrap_ttl(), Duration::from_secs(300));
        assert_eq!(flags.args(), strings(&["secret/foo", "-address=ignored"]));
        assert_eq!(cmd.address(), "https://127.0.0.1:8200");
    });
}

#[test]
#[serial]
fn test_hidden_flag_is_parsed_but_not_shown() {
    temp_env::with_vars(clean_env(&[]), || {
        let (cmd, _) = base_command();
        let flags = cmd.flag_set(FlagSetBit::HTTP).unwrap();
        assert!(flags.help().contains("  -tls-skip-verify"));

        flags.hide_flag("tls-skip-verify");
        assert!(flags.hidden_flag("tls-skip-verify"));
        assert!(!flags.help().contains("-tls-skip-verify"));

        flags.parse(&strings(&["-tls-skip-verify"])).unwrap();
        assert!(cmd.http_flags().tls_skip_verify);
    });
}

#[test]
#[serial]
fn test_help_is_deterministic_and_wrapped() {
    temp_env::with_vars(clean_env(&[]), || {
        let (cmd, _) = base_command();
        let flags = cmd
            .flag_set(FlagSetBit::HTTP | FlagSetBit::OUTPUT_FIELD | FlagSetBit::OUTPUT_FORMAT)
            .unwrap();

        let help = flags.help();
        assert_eq!(help, flags.help());
        assert!(help.starts_with("HTTP Options:\n\n  -address\n"));
        assert!(help.contains("\n\nOutput Options:\n\n  -field\n"));
        assert!(!help.ends_with('\n'));

        for line in help.lines() {
            assert!(line.chars().count() <= MAX_LINE_LENGTH, "too long: {:?}", line);
            if line.is_empty() || line.ends_with("Options:") || line.starts_with("  -") {
                continue;
            }
            let indent = line.len() - line.trim_start().len();
            assert_eq!(indent, 6, "bad indent: {:?}", line);
        }
    });
}

#[test]
#[serial]
fn test_help_order_follows_registration() {
    temp_env::with_vars(clean_env(&[]), || {
        let (cmd, _) = base_command();
        let flags = cmd.flag_set(FlagSetBit::HTTP).unwrap();
        let help = flags.help();
        let names: Vec<&str> = help
            .lines()
            .filter_map(|line| line.strip_prefix("  -"))
            .collect();
        assert_eq!(
            names,
            vec![
                "address",
                "ca-cert",
                "ca-path",
                "client-cert",
                "client-key",
                "tls-server-name",
                "tls-skip-verify",
                "wrap-ttl",
            ]
        );
    });
}

#[test]
#[serial]
fn test_command_specific_group() {
    temp_env::with_vars(clean_env(&[]), || {
        let (cmd, _) = base_command();
        let mount = Target::default();
        let flags = cmd
            .flag_set_with(FlagSetBit::HTTP, |set| {
                set.new_flag_set("Command Options", |f| {
                    f.string_var(
                        StringVar::new("mount", &mount)
                            .default("secret")
                            .example("path")
                            .usage("Mount path."),
                    )
                })
            })
            .unwrap();

        assert!(flags.help().contains("Command Options:\n\n  -mount=<path>\n      Mount path."));
        flags.parse(&strings(&["-mount", "kv"])).unwrap();
        assert_eq!(mount.get(), "kv");
    });
}
