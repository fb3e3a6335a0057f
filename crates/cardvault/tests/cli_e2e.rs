#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn cardvault_cmd(data: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("cardvault"));
    cmd.env("CARDVAULT_DATA", data.path().as_os_str())
        .env_remove("CARDVAULT_MIRROR_FILE")
        .env_remove("CARDVAULT_EXPORT_PREFIX")
        .env_remove("CARDVAULT_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

fn json_output(data: &TempDir, args: &[&str]) -> Value {
    let output = cardvault_cmd(data)
        .arg("--json")
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?} failed: {:?}", args, output);
    serde_json::from_slice(&output.stdout).unwrap()
}

fn add_card(data: &TempDir, args: &[&str]) -> String {
    let mut full = vec!["add"];
    full.extend_from_slice(args);
    let card = json_output(data, &full);
    card["id"].as_str().unwrap().to_string()
}

#[test]
fn add_then_list_and_show() {
    let data = TempDir::new().unwrap();

    cardvault_cmd(&data)
        .args(["add", "--name", "Volt Mouse", "--author", "Ash", "--type", "Electric"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Card saved: Volt Mouse"));

    cardvault_cmd(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Volt Mouse by Ash"))
        .stdout(predicate::str::contains("Electric"));

    let listed = json_output(&data, &["list"]);
    let id = listed[0]["id"].as_str().unwrap().to_string();

    cardvault_cmd(&data)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("HP 60  ATK 40  DEF 30"));
}

#[test]
fn empty_collection_lists_nothing() {
    let data = TempDir::new().unwrap();
    cardvault_cmd(&data)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No cards found."));
}

#[test]
fn edit_changes_only_given_fields() {
    let data = TempDir::new().unwrap();
    let id = add_card(&data, &["--name", "Volt", "--hp", "70", "--image", "https://img.test/v.png"]);

    cardvault_cmd(&data)
        .args(["edit", &id, "--attack", "99"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Card updated: Volt"));

    let card = json_output(&data, &["show", &id]);
    assert_eq!(card["id"], id.as_str());
    assert_eq!(card["name"], "Volt");
    assert_eq!(card["hp"], 70);
    assert_eq!(card["attack"], 99);
    assert_eq!(card["image"], "https://img.test/v.png");
    assert_eq!(json_output(&data, &["list"]).as_array().unwrap().len(), 1);
}

#[test]
fn rm_deletes_and_missing_ids_fail() {
    let data = TempDir::new().unwrap();
    let id = add_card(&data, &["--name", "Gone"]);

    cardvault_cmd(&data).args(["rm", &id]).assert().success();

    cardvault_cmd(&data)
        .args(["show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Card not found"));
}

#[test]
fn search_and_stats() {
    let data = TempDir::new().unwrap();
    add_card(&data, &["--name", "Blaze", "--author", "Ash", "--type1", "Fire", "--type2", "Flying"]);
    add_card(&data, &["--name", "Drip", "--author", "Misty", "--type1", "Water"]);

    let by_author = json_output(&data, &["search", "--author", "Ash"]);
    assert_eq!(by_author.as_array().unwrap().len(), 1);
    assert_eq!(by_author[0]["name"], "Blaze");

    let by_text = json_output(&data, &["search", "drip"]);
    assert_eq!(by_text.as_array().unwrap().len(), 1);

    let by_type = json_output(&data, &["search", "--type", "Flying"]);
    assert_eq!(by_type[0]["name"], "Blaze");

    let stats = json_output(&data, &["stats"]);
    assert_eq!(stats["totalCards"], 2);
    assert_eq!(stats["authorCount"], 2);
    assert_eq!(stats["types"], serde_json::json!(["Fire", "Flying", "Water"]));
}

#[test]
fn export_then_import_doubles_the_collection() {
    let data = TempDir::new().unwrap();
    add_card(&data, &["--name", "One"]);
    add_card(&data, &["--name", "Two"]);

    let file = data.path().join("export.json");
    cardvault_cmd(&data)
        .args(["export", "-o", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 card(s)"));

    let document: Value = serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(document["cardCount"], 2);

    cardvault_cmd(&data)
        .args(["import", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 card(s)"));

    let listed = json_output(&data, &["list"]);
    assert_eq!(listed.as_array().unwrap().len(), 4);
}

#[test]
fn import_from_stdin_skips_bad_entries() {
    let data = TempDir::new().unwrap();
    cardvault_cmd(&data)
        .args(["import", "-"])
        .write_stdin(r#"{"cards": [{"name": "Piped", "hp": "80"}, 7]}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 card(s)"))
        .stdout(predicate::str::contains("Skipped 1 entry"));

    let listed = json_output(&data, &["list"]);
    assert_eq!(listed[0]["hp"], 80);
}

#[test]
fn malformed_import_fails() {
    let data = TempDir::new().unwrap();
    let file = data.path().join("broken.json");
    fs::write(&file, "this is not json").unwrap();

    cardvault_cmd(&data)
        .args(["import", file.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn wiped_store_is_restored_from_mirror() {
    let data = TempDir::new().unwrap();
    add_card(&data, &["--name", "Survivor"]);
    add_card(&data, &["--name", "Also Survivor"]);

    fs::remove_dir_all(data.path().join("cards")).unwrap();

    cardvault_cmd(&data)
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("Restored 2 card(s)"))
        .stdout(predicate::str::contains("Also Survivor"));

    cardvault_cmd(&data)
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Store and backup mirror agree."));
}

#[test]
fn clear_requires_confirmation() {
    let data = TempDir::new().unwrap();
    add_card(&data, &["--name", "Keep me"]);

    cardvault_cmd(&data)
        .arg("clear")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
    assert_eq!(json_output(&data, &["list"]).as_array().unwrap().len(), 1);

    cardvault_cmd(&data)
        .args(["clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 card(s)"));
    assert!(json_output(&data, &["list"]).as_array().unwrap().is_empty());
}

#[test]
fn config_file_renames_the_mirror() {
    let data = TempDir::new().unwrap();
    fs::write(data.path().join("cardvault.toml"), "mirror_file = \"mirror.json\"\n").unwrap();

    add_card(&data, &["--name", "Mirrored"]);

    assert!(data.path().join("mirror.json").exists());
    assert!(!data.path().join("cards-backup.json").exists());
}

#[test]
fn completions_need_no_data_dir() {
    let data = TempDir::new().unwrap();
    cardvault_cmd(&data)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cardvault"));
    assert!(fs::read_dir(data.path()).unwrap().next().is_none());
}
