use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};

fn imcode() -> Command {
    Command::new(env!("CARGO_BIN_EXE_imcode"))
}

fn write_cypher(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .unwrap();
    fs::write(path, bytes).unwrap();
}

#[test]
fn test_encode_decode_files() {
    let dir = tempfile::tempdir().unwrap();
    let cypher = dir.path().join("cypher.png");
    let secret = dir.path().join("secret.txt");
    let coded = dir.path().join("coded.png");
    let recovered = dir.path().join("recovered.txt");

    write_cypher(&cypher, 64, 48);
    fs::write(&secret, "the eagle lands at midnight\n").unwrap();

    let status = imcode()
        .args(["--from", secret.to_str().unwrap()])
        .args(["--cypher", cypher.to_str().unwrap()])
        .args(["--to", coded.to_str().unwrap()])
        .status()
        .unwrap();
    assert!(status.success());

    let status = imcode()
        .arg("--decode")
        .args(["--from", coded.to_str().unwrap()])
        .args(["--cypher", cypher.to_str().unwrap()])
        .args(["--to", recovered.to_str().unwrap()])
        .status()
        .unwrap();
    assert!(status.success());

    assert_eq!(fs::read(&recovered).unwrap(), fs::read(&secret).unwrap());
}

#[test]
fn test_payload_from_stdin_image_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let cypher = dir.path().join("cypher.png");
    write_cypher(&cypher, 20, 20);

    let mut child = imcode()
        .args(["--from", "-", "--cypher", cypher.to_str().unwrap()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"piped payload")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let coded = dir.path().join("coded.png");
    fs::write(&coded, &output.stdout).unwrap();

    let output = imcode()
        .args(["-d", "-f", coded.to_str().unwrap(), "-c", cypher.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, b"piped payload");
}

#[test]
fn test_over_capacity_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let cypher = dir.path().join("cypher.png");
    let secret = dir.path().join("secret.bin");
    let coded = dir.path().join("coded.png");

    write_cypher(&cypher, 4, 4);
    fs::write(&secret, vec![1u8; 100]).unwrap();

    let output = imcode()
        .args(["--from", secret.to_str().unwrap()])
        .args(["--cypher", cypher.to_str().unwrap()])
        .args(["--to", coded.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("42 bytes"));
    assert!(!coded.exists());
}

#[test]
fn test_two_stdins_rejected() {
    let output = imcode()
        .args(["--from", "-", "--cypher", "-"])
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("standard input"));
}

#[test]
fn test_capacity_report() {
    let dir = tempfile::tempdir().unwrap();
    let cypher = dir.path().join("cypher.png");
    write_cypher(&cypher, 10, 10);

    let output = imcode()
        .args(["--capacity", "--cypher", cypher.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "10x10: 294 bytes (2 meta pixels)\n"
    );
}

#[test]
fn test_version() {
    let output = imcode().arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}
