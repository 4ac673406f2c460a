//! Convert every fixture dump and check it against the expected
//! literal, printing a pass/fail summary.

use libprintr::convert;
use std::fs;
use std::path::Path;

fn main() {
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("test");

    let mut passed = 0;
    let mut failed = 0;

    let mut entries: Vec<_> = fs::read_dir(test_dir.join("dump"))
        .expect("test/dump directory")
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "txt").unwrap_or(false))
        .collect();
    entries.sort();

    for path in entries {
        let basename = path.file_stem().unwrap().to_string_lossy().to_string();
        let dump = fs::read_to_string(&path).unwrap();
        let expected_path = test_dir.join("php").join(format!("{}.php", basename));
        let expected = fs::read_to_string(&expected_path).unwrap();

        match convert(&dump) {
            Ok(literal) if literal == expected.trim_end() => {
                println!("PASS {}", basename);
                passed += 1;
            }
            Ok(literal) => {
                println!("FAIL {}", basename);
                println!("  expected: {}", expected.trim_end());
                println!("  actual:   {}", literal);
                failed += 1;
            }
            Err(err) => {
                println!("FAIL {} (parse error: {})", basename, err);
                failed += 1;
            }
        }
    }

    println!("\n{} passed, {} failed", passed, failed);
    if failed > 0 {
        std::process::exit(1);
    }
}
