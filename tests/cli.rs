use std::io::Cursor;
use std::path::Path;

use assert_cmd::Command;
use image::{ImageFormat, Rgba, RgbaImage};
use predicates::prelude::*;
use tempfile::TempDir;

fn floormark_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("floormark").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", home).env("HOME", home);
    cmd
}

fn write_plan(path: &Path) {
    let image = RgbaImage::from_pixel(300, 150, Rgba([230, 230, 230, 255]));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    std::fs::write(path, out.into_inner()).unwrap();
}

const BATCH: &str = r#"{
    "markers": [
        {"label": "1", "position": {"x": 25.0, "y": 50.0}, "serial": "SN-1", "name": "Lobby"},
        {"label": "2", "position": {"x": 75.0, "y": 50.0}}
    ],
    "regions": [
        {"x": 10.0, "y": 10.0, "w": 50.0, "h": 30.0, "surface": {"width": 300.0, "height": 150.0}}
    ]
}"#;

#[test]
fn floormark_help_prints_usage() {
    let temp = TempDir::new().unwrap();
    floormark_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Floor-plan annotation and compositing engine",
        ));
}

#[test]
fn export_requires_an_image() {
    let temp = TempDir::new().unwrap();
    floormark_cmd(temp.path())
        .arg("export")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn export_writes_png_and_records() {
    let temp = TempDir::new().unwrap();
    let plan = temp.path().join("plan.png");
    let batch = temp.path().join("batch.json");
    let output = temp.path().join("out").join("layout.png");
    let records = temp.path().join("records.json");
    write_plan(&plan);
    std::fs::write(&batch, BATCH).unwrap();

    floormark_cmd(temp.path())
        .args(["export", "--company", "Lotus", "--branch", "Bang Na"])
        .args(["--recorder", "somchai"])
        .arg("--image")
        .arg(&plan)
        .arg("--annotations")
        .arg(&batch)
        .arg("--output")
        .arg(&output)
        .arg("--records")
        .arg(&records)
        .assert()
        .success()
        .stdout(predicate::str::contains("(300x150)"));

    let exported = image::open(&output).unwrap();
    assert_eq!((exported.width(), exported.height()), (300, 150));

    floormark_cmd(temp.path())
        .args(["history", "--company", "lotus"])
        .arg("--records")
        .arg(&records)
        .assert()
        .success()
        .stdout(predicate::str::contains("Lotus/Bang Na  #1 SN-1 [Single] Lobby"))
        .stdout(predicate::str::contains("by somchai"));
}

#[test]
fn resumed_exports_keep_the_record_count() {
    let temp = TempDir::new().unwrap();
    let plan = temp.path().join("plan.png");
    let batch = temp.path().join("batch.json");
    let records = temp.path().join("records.json");
    write_plan(&plan);
    std::fs::write(&batch, BATCH).unwrap();

    let export = |extra: &[&str]| {
        floormark_cmd(temp.path())
            .args(["export", "--company", "Lotus", "--branch", "Bang Na"])
            .arg("--image")
            .arg(&plan)
            .arg("--output")
            .arg(temp.path().join("layout.png"))
            .arg("--records")
            .arg(&records)
            .args(extra)
            .assert()
            .success();
    };
    let stored = || {
        let data = std::fs::read_to_string(&records).unwrap();
        serde_json::from_str::<Vec<serde_json::Value>>(&data)
            .unwrap()
            .len()
    };

    export(&["--annotations", batch.to_str().unwrap()]);
    assert_eq!(stored(), 2);

    export(&["--resume"]);
    export(&["--resume"]);
    assert_eq!(stored(), 2);
}

#[test]
fn export_uses_suggested_filename_in_out_dir() {
    let temp = TempDir::new().unwrap();
    let plan = temp.path().join("plan.png");
    let out_dir = temp.path().join("exports");
    write_plan(&plan);

    floormark_cmd(temp.path())
        .args(["export", "--branch", "Bang Na", "--no-footer"])
        .arg("--image")
        .arg(&plan)
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success();

    let names: Vec<String> = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("Layout_Bang_Na_"), "got {names:?}");
    assert!(names[0].ends_with(".png"));
}

#[test]
fn export_rejects_undecodable_image() {
    let temp = TempDir::new().unwrap();
    let plan = temp.path().join("plan.png");
    std::fs::write(&plan, "not an image").unwrap();

    floormark_cmd(temp.path())
        .arg("export")
        .arg("--image")
        .arg(&plan)
        .arg("--output")
        .arg(temp.path().join("out.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load image"));
}

#[test]
fn history_reports_empty_store() {
    let temp = TempDir::new().unwrap();
    floormark_cmd(temp.path())
        .arg("history")
        .arg("--records")
        .arg(temp.path().join("missing.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No records found"));
}
