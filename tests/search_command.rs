// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_dataset(dir: &Path) {
    let doc = json!({
        "meta": {
            "last_updated": "2024-05-01T10:00:00",
            "record_count": 6,
            "columns": ["Legenda:", "KAM", "Likvidace", "KAPU", "Unnamed: 5", "Unnamed: 6", "Unnamed: 7", "Unnamed: 11"]
        },
        "data": [
            { "Legenda:": "Stav", "KAM": "Číslo smlouvy", "Likvidace": "IČ firmy", "KAPU": "Název firmy",
              "Unnamed: 5": "Ulice", "Unnamed: 6": "PSČ", "Unnamed: 7": "Obec", "Unnamed: 11": "Druh" },
            { "Legenda:": "", "KAM": "100", "Likvidace": "111", "KAPU": "Autoservis Novák",
              "Unnamed: 5": "Hlavní 1", "Unnamed: 6": "25001", "Unnamed: 7": "Praha-východ",
              "Unnamed: 11": "Autorizovaný servis DIRECT" },
            { "Legenda:": "", "KAM": "100", "Likvidace": "111", "KAPU": "Autoservis Novák",
              "Unnamed: 5": "Nádražní 5", "Unnamed: 6": "28002", "Unnamed: 7": "Kolín",
              "Unnamed: 11": "Autorizovaný servis DIRECT" },
            { "Legenda:": "", "KAM": "200", "Likvidace": "222", "KAPU": "Moto Brno",
              "Unnamed: 5": "", "Unnamed: 6": "", "Unnamed: 7": "Brno",
              "Unnamed: 11": "Autorizovaný servis DIRECT motocykly" },
            { "Legenda:": "", "KAM": "300", "Likvidace": "333", "KAPU": "Skla & Spol",
              "Unnamed: 5": "", "Unnamed: 6": "", "Unnamed: 7": "Praha",
              "Unnamed: 11": "AutoskloDIRECT" },
            { "Legenda:": "", "KAM": "1", "Likvidace": "A", "KAPU": "X",
              "Unnamed: 5": "", "Unnamed: 6": "", "Unnamed: 7": "", "Unnamed: 11": "PDR opravy" }
        ]
    });
    fs::write(
        dir.join("data_output.json"),
        serde_json::to_string_pretty(&doc).expect("json"),
    )
    .expect("write dataset");
}

fn servisy(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("servisy"));
    cmd.current_dir(dir.path()).env("NO_COLOR", "1");
    cmd
}

fn json_output(dir: &TempDir, args: &[&str]) -> Value {
    let assert = servisy(dir).args(args).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    serde_json::from_str(&stdout).expect("json")
}

#[test]
fn search_ignores_diacritics_and_highlights_each_word() {
    let dir = TempDir::new().expect("tempdir");
    write_dataset(dir.path());

    let json = json_output(
        &dir,
        &["--format", "json", "search", "praha", "vychod", "--branches"],
    );
    assert_eq!(json["meta"]["command"], "search");
    assert_eq!(json["meta"]["category"], "auta");
    assert_eq!(json["meta"]["total"], 1);

    let group = &json["results"][0];
    assert_eq!(group["branch_count"], 2);
    assert_eq!(group["cells"][0]["text"], "Autoservis Novák");
    assert_eq!(group["cells"][0]["label"], "Název firmy");

    let city = group["branches"][0]["cells"]
        .as_array()
        .expect("cells")
        .iter()
        .find(|c| c["column"] == "Unnamed: 7")
        .expect("city cell");
    assert_eq!(
        city["html"],
        "<mark class=\"highlight\">Praha</mark>-<mark class=\"highlight\">východ</mark>"
    );
}

#[test]
fn category_selects_tab() {
    let dir = TempDir::new().expect("tempdir");
    write_dataset(dir.path());

    let moto = json_output(&dir, &["--format", "json", "search", "-c", "moto"]);
    assert_eq!(moto["meta"]["category"], "moto");
    assert_eq!(moto["results"][0]["cells"][0]["text"], "Moto Brno");

    let pdr = json_output(&dir, &["--format", "json", "search", "--category", "pdr"]);
    assert_eq!(pdr["meta"]["total"], 1);
    assert_eq!(pdr["results"][0]["category"], "pdr");
    assert_eq!(pdr["results"][0]["branch_count"], 1);
}

#[test]
fn html_cells_escape_markup_around_matches() {
    let dir = TempDir::new().expect("tempdir");
    write_dataset(dir.path());

    let json = json_output(&dir, &["--format", "json", "search", "-c", "skla", "spol"]);
    assert_eq!(
        json["results"][0]["cells"][0]["html"],
        "Skla &amp; <mark class=\"highlight\">Spol</mark>"
    );
}

#[test]
fn text_output_lists_services() {
    let dir = TempDir::new().expect("tempdir");
    write_dataset(dir.path());

    servisy(&dir)
        .args(["search", "kolin", "--branches"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Auta · 1 of 1 services"))
        .stdout(predicate::str::contains("Autoservis Novák"))
        .stdout(predicate::str::contains("(2 branches)"))
        .stdout(predicate::str::contains("- Nádražní 5, 28002 Kolín"));
}

#[test]
fn limit_caps_printed_results() {
    let dir = TempDir::new().expect("tempdir");
    write_dataset(dir.path());

    let json = json_output(&dir, &["--format", "json", "search", "-c", "skla", "--limit", "0"]);
    assert_eq!(json["meta"]["total"], 1);
    assert_eq!(json["meta"]["shown"], 1);

    let json = json_output(&dir, &["--format", "json", "search", "praha", "-m", "1"]);
    assert_eq!(json["meta"]["shown"], 1);
}

#[test]
fn missing_data_file_shows_fixed_message() {
    let dir = TempDir::new().expect("tempdir");

    servisy(&dir)
        .args(["search", "praha"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Nepodařilo se načíst data ze souboru data_output.json.",
        ));

    let json = json_output(&dir, &["--format", "json", "search"]);
    assert_eq!(json["meta"]["error"], "Nepodařilo se načíst data ze souboru data_output.json.");
    assert_eq!(json["results"].as_array().map(Vec::len), Some(0));
}

#[test]
fn config_file_sets_defaults() {
    let dir = TempDir::new().expect("tempdir");
    write_dataset(dir.path());
    fs::rename(dir.path().join("data_output.json"), dir.path().join("servisy.json"))
        .expect("rename");
    fs::write(
        dir.path().join(".servisyrc.toml"),
        "data_file = \"servisy.json\"\ndefault_category = \"skla\"\ndefault_format = \"json\"\n",
    )
    .expect("write config");

    let json = json_output(&dir, &["search"]);
    assert_eq!(json["meta"]["category"], "skla");
    assert_eq!(json["meta"]["total"], 1);
}

#[test]
fn simple_classifier_has_three_tabs() {
    let dir = TempDir::new().expect("tempdir");
    write_dataset(dir.path());

    // the motorcycle and pdr services fall back to auta
    let json = json_output(
        &dir,
        &["--format", "json", "--classifier", "simple", "search"],
    );
    assert_eq!(json["meta"]["total"], 3);
}
