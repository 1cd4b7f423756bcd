// tests/config_layers.rs
use delivery_time_aggregator::config::aggregator::{
    ENV_CONFIG_PATH, ENV_INPUT_FILE, ENV_OUTPUT_FILE, ENV_UNIT_SECS, ENV_WINDOW_SIZE,
};
use delivery_time_aggregator::AggregatorConfig;
use std::{env, fs, path::PathBuf};

fn clear_env() {
    for k in [
        ENV_CONFIG_PATH,
        ENV_INPUT_FILE,
        ENV_OUTPUT_FILE,
        ENV_WINDOW_SIZE,
        ENV_UNIT_SECS,
    ] {
        env::remove_var(k);
    }
}

#[test]
fn explicit_toml_and_json_files() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("aggregator.toml");
    fs::write(
        &p_toml,
        r#"
input_file = "logs/events.jsonl"
window_size = 15
"#,
    )
    .unwrap();
    let cfg = AggregatorConfig::load_from_file(&p_toml).unwrap();
    assert_eq!(cfg.input_file, PathBuf::from("logs/events.jsonl"));
    assert_eq!(cfg.window_size, 15);
    assert_eq!(cfg.unit_secs, 60);

    let p_json = dir.path().join("aggregator.json");
    fs::write(&p_json, r#"{"output_file": "-", "unit_secs": 1}"#).unwrap();
    let cj = AggregatorConfig::load_from_file(&p_json).unwrap();
    assert_eq!(cj.output_file, PathBuf::from("-"));
    assert_eq!(cj.unit_secs, 1);
    assert_eq!(cj.window_size, 10);
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so a real config/ directory in the repo is not picked up
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    // 1) Nothing on disk → defaults
    assert_eq!(
        AggregatorConfig::load_default().unwrap(),
        AggregatorConfig::default()
    );

    // 2) Fallback TOML in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("aggregator.toml"), "window_size = 4\n").unwrap();
    assert_eq!(AggregatorConfig::load_default().unwrap().window_size, 4);

    // 3) Env path wins over the fallback
    let p_env = tmp.path().join("other.json");
    fs::write(&p_env, r#"{"window_size": 7}"#).unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(AggregatorConfig::load_default().unwrap().window_size, 7);

    // 4) Env path pointing nowhere is an error
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(AggregatorConfig::load_default().is_err());

    clear_env();
    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn env_overrides_fields() {
    clear_env();
    let mut cfg = AggregatorConfig::default();

    env::set_var(ENV_INPUT_FILE, "in.jsonl");
    env::set_var(ENV_WINDOW_SIZE, " 3 ");
    env::set_var(ENV_UNIT_SECS, "30");
    cfg.apply_env().unwrap();
    assert_eq!(cfg.input_file, PathBuf::from("in.jsonl"));
    assert_eq!(cfg.window_size, 3);
    assert_eq!(cfg.unit_secs, 30);
    assert_eq!(cfg.output_file, PathBuf::from("aggregated_events.out.json"));

    env::set_var(ENV_WINDOW_SIZE, "ten");
    assert!(cfg.apply_env().is_err());

    clear_env();
}
