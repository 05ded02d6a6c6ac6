use std::fs;
use std::path::PathBuf;

use rosterpix::{ClassSelector, Roster, Row, TableRenderer};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests/goldens/expected");
    p.push(name);
    p
}

fn fixture() -> Roster {
    Roster::new(vec![
        Row::new("1001", "Alice", "C1"),
        Row::new("1002", "Bob", "C1"),
        Row::new("2001", "Carl", "C2"),
        Row::new("2002", "Zoë", "C2"),
    ])
    .expect("fixture is grouped")
}

fn check_golden(name: &str, digest: &str) {
    let expected_path = golden_path(name);
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        if let Some(dir) = expected_path.parent() {
            fs::create_dir_all(dir).ok();
        }
        fs::write(&expected_path, digest).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    let exp = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
        panic!(
            "no golden at {:?} ({}); run with UPDATE_GOLDENS=1 to create it",
            expected_path, e
        )
    });
    assert_eq!(digest, exp.trim(), "raster for {} changed", name);
}

#[test]
fn golden_all_classes_table() {
    let roster = fixture();
    let raster = TableRenderer::default().rasterize(roster.filter(&ClassSelector::All), true);
    check_golden("all_classes.sha256", &raster.digest());
}

#[test]
fn golden_single_class_table() {
    let roster = fixture();
    let raster = TableRenderer::default().rasterize(roster.filter(&ClassSelector::parse("C2")), false);
    check_golden("class_c2.sha256", &raster.digest());
}

#[test]
fn golden_header_only_table() {
    let raster = TableRenderer::default().rasterize(&[], false);
    check_golden("header_only.sha256", &raster.digest());
}

#[test]
fn every_golden_is_committed() {
    for name in ["all_classes.sha256", "class_c2.sha256", "header_only.sha256"] {
        let digest = fs::read_to_string(golden_path(name)).expect("golden present");
        let digest = digest.trim();
        assert_eq!(digest.len(), 64, "{} is not a sha256 hex digest", name);
        assert!(digest.bytes().all(|b| b.is_ascii_hexdigit()));
    }
}

#[test]
fn digest_is_stable_within_a_run() {
    let roster = fixture();
    let r = TableRenderer::default();
    let a = r.rasterize(roster.rows(), true).digest();
    let b = r.rasterize(roster.rows(), true).digest();
    assert_eq!(a, b);
    assert_eq!(a.len(), 64);
}
