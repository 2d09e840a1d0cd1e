mod common;
mod utils;

use anyhow::Result;
use common::TestEnvironment;

#[test]
fn test_history_show_empty() -> Result<()> {
    let env = TestEnvironment::new()?;

    let output = utils::run_memewall(&env, &["history", "show"])?;
    assert_eq!(output.exit_code, 0, "history show failed: {}", output.stderr);
    assert!(output.stdout.contains("No memes shown yet"));

    Ok(())
}

#[test]
fn test_history_show_lists_ids_oldest_first() -> Result<()> {
    let env = TestEnvironment::new()?;
    utils::write_file(
        &env.history_path(),
        r#"{"shown_memes": ["https://i.redd.it/a.jpg", "https://i.redd.it/b.jpg"]}"#,
    )?;

    let output = utils::run_memewall(&env, &["history", "show"])?;
    assert_eq!(output.exit_code, 0, "history show failed: {}", output.stderr);

    let a = output.stdout.find("https://i.redd.it/a.jpg").expect("a listed");
    let b = output.stdout.find("https://i.redd.it/b.jpg").expect("b listed");
    assert!(a < b);
    assert!(output.stdout.contains("2 of 100 slots used"));

    Ok(())
}

#[test]
fn test_history_respects_configured_capacity() -> Result<()> {
    let env = TestEnvironment::new()?;
    utils::write_file(&env.settings_path(), r#"{"max_history": 3}"#)?;
    utils::write_file(&env.history_path(), r#"{"shown_memes": ["a", "b", "c", "d"]}"#)?;

    let output = utils::run_memewall(&env, &["history", "show"])?;
    assert_eq!(output.exit_code, 0, "history show failed: {}", output.stderr);
    assert!(!output.stdout.contains("  a\n"));
    assert!(output.stdout.contains("  d\n"));
    assert!(output.stdout.contains("3 of 3 slots used"));

    Ok(())
}

#[test]
fn test_history_clear() -> Result<()> {
    let env = TestEnvironment::new()?;
    utils::write_file(&env.history_path(), r#"{"shown_memes": ["a", "b"]}"#)?;

    let output = utils::run_memewall(&env, &["history", "clear"])?;
    assert_eq!(output.exit_code, 0, "history clear failed: {}", output.stderr);

    let value: serde_json::Value = serde_json::from_str(&utils::read_file(&env.history_path())?)?;
    assert_eq!(value, serde_json::json!({"shown_memes": []}));

    Ok(())
}

#[test]
fn test_corrupt_history_is_reported_by_show() -> Result<()> {
    let env = TestEnvironment::new()?;
    utils::write_file(&env.history_path(), "not json")?;

    let output = utils::run_memewall(&env, &["history", "show"])?;
    assert_ne!(output.exit_code, 0);
    assert!(output.stderr.contains("corrupt"), "stderr: {}", output.stderr);

    Ok(())
}

#[test]
fn test_config_init_then_show() -> Result<()> {
    let env = TestEnvironment::new()?;

    let output = utils::run_memewall(&env, &["config", "init"])?;
    assert_eq!(output.exit_code, 0, "config init failed: {}", output.stderr);

    let written: serde_json::Value =
        serde_json::from_str(&utils::read_file(&env.settings_path())?)?;
    assert_eq!(written["max_history"], 100);
    assert_eq!(written["font"]["name"], "arial.ttf");
    assert_eq!(written["subreddits"][0], serde_json::Value::Null);

    // A second init leaves the file alone
    utils::write_file(&env.settings_path(), r#"{"max_history": 7}"#)?;
    let output = utils::run_memewall(&env, &["config", "init"])?;
    assert_eq!(output.exit_code, 0);
    assert!(output.stdout.contains("already exist"));

    let output = utils::run_memewall(&env, &["config", "show"])?;
    assert_eq!(output.exit_code, 0, "config show failed: {}", output.stderr);
    let shown: serde_json::Value = serde_json::from_str(&output.stdout)?;
    assert_eq!(shown["max_history"], 7);
    assert_eq!(shown["bottom_strip_height"], 50);

    Ok(())
}

#[test]
fn test_invalid_config_is_fatal() -> Result<()> {
    let env = TestEnvironment::new()?;
    utils::write_file(&env.settings_path(), r#"{"max_history": 0}"#)?;

    let output = utils::run_memewall(&env, &["config", "show"])?;
    assert_ne!(output.exit_code, 0);
    assert!(output.stderr.contains("max_history"), "stderr: {}", output.stderr);

    Ok(())
}

#[cfg(target_os = "linux")]
#[test]
fn test_run_without_desktop_fails_before_fetching() -> Result<()> {
    let env = TestEnvironment::new()?;

    let output = utils::run_memewall(&env, &[])?;
    assert_ne!(output.exit_code, 0);
    assert!(
        output.stderr.contains("Don't know how to set the wallpaper"),
        "stderr: {}",
        output.stderr
    );
    assert!(!env.history_path().exists());

    Ok(())
}
