//! Integration tests for the command-line interface
//!
//! Runs the built binary against temporary Ruby trees.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to create a small Ruby project with one broken file
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();

    fs::create_dir_all(dir.path().join("lib/shop")).unwrap();
    fs::write(
        dir.path().join("lib/shop/cart.rb"),
        r#"module Shop
  class Cart
    def self.empty
      new([])
    end

    def total
      items.sum(&:price)
    end
  end
end
"#,
    )
    .unwrap();

    fs::write(
        dir.path().join("lib/shop/order.rb"),
        r#"module Shop
  class Order
    def total
      0
    end
  end
end
"#,
    )
    .unwrap();

    fs::write(dir.path().join("lib/broken.rb"), "class Broken\n  def oops(\n").unwrap();

    dir
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ruby-outline"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_help() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tree"));
    assert!(stdout.contains("find"));
    assert!(stdout.contains("show"));
}

#[test]
fn test_tree_lists_declarations_and_reports_broken_file() {
    let dir = setup_project();
    let output = run(&["tree", dir.path().to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("class method empty"));
    assert!(stdout.contains("instance method total"));
    assert!(!stdout.contains("Broken"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    let broken = dir.path().join("lib/broken.rb");
    let diagnostics: Vec<_> = stderr
        .lines()
        .filter(|line| line.starts_with(&format!("{}: ", broken.display())))
        .collect();
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_tree_json() {
    let dir = setup_project();
    let output = run(&["tree", "--json", dir.path().to_str().unwrap()]);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(report["root"]["kind"], "root");
    assert!(report["root"].get("first_line").is_none());
    assert_eq!(report["failures"].as_array().unwrap().len(), 1);

    let modules = report["root"]["children"].as_array().unwrap();
    assert_eq!(modules.len(), 2);
    assert_eq!(modules[0]["name"], "Shop");
    assert_eq!(modules[0]["children"][0]["name"], "Cart");
    assert_eq!(modules[0]["children"][0]["first_line"], 2);
    assert_eq!(modules[0]["children"][0]["last_line"], 10);
}

#[test]
fn test_find_by_name_and_kind() {
    let dir = setup_project();
    let output = run(&["find", dir.path().to_str().unwrap(), "total"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("cart.rb:7-9"));
    assert!(lines[1].contains("order.rb:3-5"));

    let output = run(&[
        "find",
        dir.path().to_str().unwrap(),
        "empty",
        "--kind",
        "instance-method",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_show_prints_numbered_source() {
    let dir = setup_project();
    let output = run(&["show", dir.path().to_str().unwrap(), "empty"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("    3 |     def self.empty"));
    assert!(stdout.contains("    4 |       new([])"));
    assert!(stdout.contains("    5 |     end"));
    assert!(!stdout.contains("def total"));
}

#[test]
fn test_config_file_and_exclude_override() {
    let dir = setup_project();
    let config = dir.path().join("outline.toml");
    fs::write(&config, "[scan]\nexclude = \"^lib/shop/order\"\n").unwrap();

    let output = run(&[
        "find",
        dir.path().to_str().unwrap(),
        "total",
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 1);

    let output = run(&[
        "find",
        dir.path().to_str().unwrap(),
        "Cart",
        "--exclude",
        "cart",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_invalid_config_fails() {
    let dir = setup_project();
    let config = dir.path().join("outline.toml");
    fs::write(&config, "[scan]\nextensions = []\n").unwrap();

    let output = run(&[
        "tree",
        dir.path().to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("at least one extension"));
}
