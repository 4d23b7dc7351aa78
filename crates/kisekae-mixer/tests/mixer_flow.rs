#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! End-to-end tests driving mixer programs against the fixture preset bank

use kisekae_formats::Registry;
use kisekae_mixer::{
    FileResolver, MixerProgram, SplitSpec, list_presets, output_codes, read_code, split_code,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn fixtures_dir() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .leak()
}

fn registry() -> Arc<Registry> {
    let dir = fixtures_dir();
    Arc::new(
        Registry::from_paths(dir.join("subcodes.json"), dir.join("components.json"))
            .expect("Fixture registry should load"),
    )
}

fn bank_resolver() -> FileResolver {
    FileResolver::new(registry(), fixtures_dir().join("bank"))
}

fn outfits() -> MixerProgram {
    MixerProgram::load(fixtures_dir().join("outfits.json")).expect("Program fixture should load")
}

#[test]
fn outfit_program_respects_tags() {
    let codes = outfits().enumerate_names(&bank_resolver()).unwrap();

    let names: Vec<&str> = codes.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec![
            "shirt_boots_pose0",
            "shirt_boots_pose1",
            "shirt_sandals_pose0",
            "shirt_sandals_pose1",
            "dress_sandals_pose0",
            "dress_sandals_pose1",
        ]
    );
}

#[test]
fn outfit_codes_merge_in_option_order() {
    let codes = outfits().enumerate_names(&bank_resolver()).unwrap();

    assert_eq!(
        codes["shirt_boots_pose1"].to_string(),
        "68**ja1.111111.222222_ka1_jd17.AAAAAA.BBBBBB.CCCCCC_je17.AAAAAA.BBBBBB.CCCCCC_aa1.0.0_ba1"
    );
    assert_eq!(
        codes["dress_sandals_pose0"].to_string(),
        "105**ja2.333333.444444_jd1.111111.222222.333333.5.444444.555555.0_aa2.0.0_ba2"
    );
}

#[test]
fn mixing_newer_code_migrates_older_shoes() {
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("stage.kkl"), "105**aa3").unwrap();

    let program = MixerProgram::from_json(
        r#"{
            "destdir": "",
            "options": [
                {"name": "shoes", "sources": [{"source": "internal", "name": "boots", "path": "shoes/boots"}]},
                {"name": "stage", "sources": [{"name": "stage", "path": "stage"}]}
            ]
        }"#,
    )
    .unwrap();
    let resolver = bank_resolver().with_working_dir(work.path());

    let codes = program.enumerate_names(&resolver).unwrap();
    assert_eq!(
        codes["boots_stage"].to_string(),
        "105**jd14.AAAAAA.CCCCCC.CCCCCC.8.AAAAAA.BBBBBB_je14.AAAAAA.CCCCCC.CCCCCC.8.AAAAAA.BBBBBB_aa3"
    );
}

#[test]
fn output_writes_one_file_per_combination() {
    let out = TempDir::new().unwrap();

    let written = output_codes(&outfits(), &bank_resolver(), out.path()).unwrap();

    assert_eq!(written.len(), 6);
    let dress = out.path().join("outfits/dress_sandals_pose1.kkl");
    assert!(written.contains(&dress));
    let text = fs::read_to_string(dress).unwrap();
    assert!(text.starts_with("105**ja2.333333.444444"));
    assert!(text.ends_with("_aa1.0.0_ba1"));
}

#[test]
fn split_written_code_back_into_parts() {
    let registry = registry();
    let out = TempDir::new().unwrap();
    output_codes(&outfits(), &bank_resolver(), out.path()).unwrap();

    let input = out.path().join("outfits/shirt_boots_pose0.kkl");
    let code = read_code(&input, &registry).unwrap();

    let clothes = SplitSpec::parse("c:clothes").unwrap();
    assert_eq!(
        clothes.output_path(&input, None),
        out.path().join("outfits/shirt_boots_pose0_clothes.kkl")
    );
    assert_eq!(
        split_code(&code, &clothes, &registry).to_string(),
        "68**ja1.111111.222222_ka1_jd17.AAAAAA.BBBBBB.CCCCCC_je17.AAAAAA.BBBBBB.CCCCCC"
    );

    let pose = SplitSpec::parse("p").unwrap();
    assert_eq!(split_code(&code, &pose, &registry).to_string(), "68**aa2.0.0_ba2");
}

#[test]
fn preset_bank_listing() {
    let presets = list_presets(&fixtures_dir().join("bank"), None).unwrap();

    assert_eq!(
        presets,
        vec![
            PathBuf::from("clothes/dress.kkl"),
            PathBuf::from("clothes/shirt.kkl"),
            PathBuf::from("pose/sit.kkl"),
            PathBuf::from("pose/wave.kkl"),
            PathBuf::from("shoes/boots.kkl"),
            PathBuf::from("shoes/sandals.kkl"),
        ]
    );
}
