use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use rasterlab::document::Document;
use rasterlab::raster::codec;
use rasterlab::session::{self, SessionOptions};
use rasterlab::tool::{GestureEvent, ToolKind};

fn rasterlab_cmd() -> Command {
    Command::cargo_bin("rasterlab").expect("binary exists")
}

#[test]
fn help_prints_about() {
    rasterlab_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Layer-based raster editing engine",
        ));
}

#[test]
fn no_args_prints_usage() {
    rasterlab_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("--render"));
}

#[test]
fn inspect_with_empty_data_dir_reports_nothing() {
    let temp = TempDir::new().unwrap();
    rasterlab_cmd()
        .env("XDG_DATA_HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("--inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("No document stored."));
}

#[test]
fn clear_with_empty_data_dir_reports_nothing() {
    let temp = TempDir::new().unwrap();
    rasterlab_cmd()
        .env("XDG_DATA_HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("--clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("No document stored."));
}

#[test]
fn render_without_stored_document_fails() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out.png");
    rasterlab_cmd()
        .env("XDG_DATA_HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path())
        .args(["--render", out.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing stored"));
}

#[test]
fn render_flattens_a_stored_document_to_png() {
    let temp = TempDir::new().unwrap();

    // Store a small painted document where the CLI will look for it.
    let mut doc = Document::new(24, 24, 10).unwrap();
    doc.stack_mut().create_layer(Some("ink"));
    doc.set_tool(ToolKind::Brush {
        color: rasterlab::raster::color::RED,
        size: 4,
    });
    doc.pointer_event(GestureEvent::start(4, 4)).unwrap();
    doc.pointer_event(GestureEvent::moved(18, 18)).unwrap();
    doc.pointer_event(GestureEvent::end(18, 18)).unwrap();

    let options = SessionOptions::new(temp.path().join("rasterlab"));
    session::save_document(&doc.snapshot("stored").unwrap(), &options).unwrap();

    let out = temp.path().join("out.png");
    rasterlab_cmd()
        .env("XDG_DATA_HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path())
        .args(["--render", out.to_str().unwrap()])
        .assert()
        .success();

    let bytes = std::fs::read(&out).unwrap();
    let flattened = codec::from_png_bytes(&bytes).unwrap();
    assert_eq!(flattened.width(), 24);
    assert_eq!(flattened.height(), 24);
    assert_eq!(
        flattened.pixel(10, 10).unwrap(),
        rasterlab::raster::color::RED
    );
}

#[test]
fn inspect_reports_a_stored_document() {
    let temp = TempDir::new().unwrap();
    let doc = Document::new(32, 16, 10).unwrap();
    let options = SessionOptions::new(temp.path().join("rasterlab"));
    session::save_document(&doc.snapshot("stored").unwrap(), &options).unwrap();

    rasterlab_cmd()
        .env("XDG_DATA_HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("--inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("32x16"))
        .stdout(predicate::str::contains("layers:        1"));
}
