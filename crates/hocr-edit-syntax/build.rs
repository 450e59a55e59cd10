/// Generates one round-trip test per document in src/fixtures/.
/// This gives us both DRY code and individual test names in the runner.
fn main() {
    let out_dir = std::env::var("OUT_DIR").expect("cargo sets OUT_DIR");
    let dest = std::path::Path::new(&out_dir).join("fixture_tests.rs");

    let mut code = String::from(
        r#"mod fixture_roundtrips {
    use super::fixture_roundtrip;
"#,
    );

    let mut entries: Vec<_> = std::fs::read_dir("src/fixtures")
        .map(|dir| dir.filter_map(|e| e.ok()).map(|e| e.path()).collect())
        .unwrap_or_default();
    entries.sort();

    for path in entries {
        let is_document = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e, "html" | "xhtml" | "hocr"));
        if !is_document {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let test_name: String = file_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        code.push_str(&format!(
            r#"
    #[test]
    fn {test_name}() {{
        fixture_roundtrip("{file_name}");
    }}
"#
        ));
    }

    code.push_str("}\n");
    std::fs::write(&dest, code).expect("failed to write generated fixture tests");

    // Rerun if fixtures change
    println!("cargo::rerun-if-changed=src/fixtures");
}
