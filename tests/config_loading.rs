use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use renderloop::cli::CliArgs;
use renderloop::config::{
    ConfigFile, apply_cli_overrides, as_millis_u64, format_duration, load_for_cli,
    load_from_path, parse_duration, resolve,
};
use renderloop::errors::SupervisorError;

type TestResult = Result<(), Box<dyn Error>>;

const FULL: &str = r#"
[renderer]
interpreter = "/usr/bin/python3"
script = "render_and_save.py"
args = ["--days", "7"]
working_dir = "/srv/calendar"
expect_output = "output.png"

[loop]
log = "/var/log/render_loop.log"
interval = "15m"
timeout = "5m"
"#;

#[test]
fn full_config_resolves_every_field() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("Renderloop.toml");
    std::fs::write(&path, FULL)?;

    let cfg = resolve(&load_from_path(&path)?)?;

    assert_eq!(cfg.interpreter, PathBuf::from("/usr/bin/python3"));
    assert_eq!(cfg.script, PathBuf::from("render_and_save.py"));
    assert_eq!(cfg.args, vec!["--days".to_string(), "7".to_string()]);
    assert_eq!(cfg.working_dir, Some(PathBuf::from("/srv/calendar")));
    assert_eq!(cfg.expect_output, Some(PathBuf::from("output.png")));
    assert_eq!(cfg.log, PathBuf::from("/var/log/render_loop.log"));
    assert_eq!(cfg.interval, Duration::from_secs(15 * 60));
    assert_eq!(cfg.timeout, Some(Duration::from_secs(5 * 60)));
    Ok(())
}

#[test]
fn loop_section_defaults_apply() -> TestResult {
    let raw: ConfigFile = toml::from_str(
        r#"
        [renderer]
        interpreter = "python3"
        script = "main.py"
        "#,
    )?;

    let cfg = resolve(&raw)?;
    assert_eq!(cfg.log, PathBuf::from("render_loop.log"));
    assert_eq!(cfg.interval, Duration::from_secs(900));
    assert_eq!(cfg.timeout, None);
    assert!(cfg.args.is_empty());
    assert_eq!(cfg.working_dir, None);
    Ok(())
}

#[test]
fn missing_script_is_a_config_error() -> TestResult {
    let raw: ConfigFile = toml::from_str(
        r#"
        [renderer]
        interpreter = "python3"
        "#,
    )?;

    match resolve(&raw) {
        Err(SupervisorError::ConfigError(msg)) => assert!(msg.contains("renderer.script")),
        other => panic!("expected config error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn blank_interpreter_is_a_config_error() -> TestResult {
    let raw: ConfigFile = toml::from_str(
        r#"
        [renderer]
        interpreter = "   "
        script = "main.py"
        "#,
    )?;

    assert!(matches!(resolve(&raw), Err(SupervisorError::ConfigError(_))));
    Ok(())
}

#[test]
fn bad_durations_are_config_errors() -> TestResult {
    for (interval, timeout) in [("soon", None), ("0s", None), ("10s", Some("0ms")), ("10", None)] {
        let mut raw = ConfigFile::default();
        raw.renderer.interpreter = Some("python3".into());
        raw.renderer.script = Some("main.py".into());
        raw.run_loop.interval = interval.into();
        raw.run_loop.timeout = timeout.map(String::from);

        assert!(
            matches!(resolve(&raw), Err(SupervisorError::ConfigError(_))),
            "interval={interval:?} timeout={timeout:?} should be rejected"
        );
    }
    Ok(())
}

#[test]
fn cli_values_override_the_file() -> TestResult {
    let mut raw: ConfigFile = toml::from_str(FULL)?;
    let args = CliArgs {
        interpreter: Some("/opt/python/bin/python".into()),
        log: Some("other.log".into()),
        interval: Some("30s".into()),
        timeout: Some("1m".into()),
        ..CliArgs::default()
    };

    apply_cli_overrides(&mut raw, &args);
    let cfg = resolve(&raw)?;

    assert_eq!(cfg.interpreter, PathBuf::from("/opt/python/bin/python"));
    assert_eq!(cfg.script, PathBuf::from("render_and_save.py"));
    assert_eq!(cfg.log, PathBuf::from("other.log"));
    assert_eq!(cfg.interval, Duration::from_secs(30));
    assert_eq!(cfg.timeout, Some(Duration::from_secs(60)));
    Ok(())
}

#[test]
fn explicit_config_path_must_exist() {
    let args = CliArgs {
        config: Some("/definitely/not/here/Renderloop.toml".into()),
        ..CliArgs::default()
    };
    assert!(load_for_cli(&args).is_err());
}

#[test]
fn load_for_cli_reads_explicit_file_and_overrides() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("render.toml");
    std::fs::write(&path, FULL)?;

    let args = CliArgs {
        config: Some(path.to_string_lossy().into_owned()),
        script: Some("main.py".into()),
        ..CliArgs::default()
    };

    let cfg = load_for_cli(&args)?;
    assert_eq!(cfg.script, PathBuf::from("main.py"));
    assert_eq!(cfg.interval, Duration::from_secs(900));
    Ok(())
}

#[test]
fn once_and_cycles_map_to_a_cycle_limit() {
    let once = CliArgs {
        once: true,
        ..CliArgs::default()
    };
    assert_eq!(once.max_cycles(), Some(1));

    let three = CliArgs {
        cycles: Some(3),
        ..CliArgs::default()
    };
    assert_eq!(three.max_cycles(), Some(3));

    assert_eq!(CliArgs::default().max_cycles(), None);
}

#[test]
fn durations_parse_with_units() -> TestResult {
    assert_eq!(parse_duration("250ms")?, Duration::from_millis(250));
    assert_eq!(parse_duration("30s")?, Duration::from_secs(30));
    assert_eq!(parse_duration(" 15m ")?, Duration::from_secs(900));
    assert_eq!(parse_duration("2H")?, Duration::from_secs(7200));

    assert!(parse_duration("").is_err());
    assert!(parse_duration("15").is_err());
    assert!(parse_duration("m").is_err());
    assert!(parse_duration("1m30s").is_err());
    assert!(parse_duration("5d").is_err());
    Ok(())
}

#[test]
fn durations_format_in_the_coarsest_exact_unit() {
    assert_eq!(format_duration(Duration::from_millis(200)), "200ms");
    assert_eq!(format_duration(Duration::from_millis(1500)), "1500ms");
    assert_eq!(format_duration(Duration::from_secs(45)), "45s");
    assert_eq!(format_duration(Duration::from_secs(900)), "15m");
    assert_eq!(format_duration(Duration::from_secs(7200)), "2h");
    assert_eq!(format_duration(Duration::ZERO), "0s");
}

#[test]
fn bundled_demo_config_is_valid() -> TestResult {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = resolve(&load_from_path(manifest.join("demos/Renderloop.toml"))?)?;

    assert_eq!(cfg.interval, Duration::from_secs(900));
    assert_eq!(cfg.args, vec!["--days".to_string(), "7".to_string()]);
    assert_eq!(cfg.timeout, None);
    Ok(())
}

#[test]
fn malformed_toml_is_a_toml_error() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("Renderloop.toml");
    std::fs::write(&path, "[renderer\ninterpreter = \"python3\"\n")?;

    assert!(matches!(load_from_path(&path), Err(SupervisorError::TomlError(_))));
    Ok(())
}

#[test]
fn unreadable_config_names_the_path() {
    let path = PathBuf::from("/definitely/not/here/Renderloop.toml");
    match load_from_path(&path) {
        Err(SupervisorError::ConfigRead { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected ConfigRead, got {other:?}"),
    }
}

#[test]
fn millis_saturate_instead_of_truncating() {
    assert_eq!(as_millis_u64(Duration::from_millis(150)), 150);
    assert_eq!(as_millis_u64(Duration::MAX), u64::MAX);
}
