//! Error collection across files

use cfold::{Diagnostics, FoldError, Location, SourceLoader};

#[test]
fn test_sorted_by_file_then_line() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.report(*FoldError::parse(Location::new("a.cf", 10), "ten"));
    diagnostics.report(*FoldError::parse(Location::new("b.cf", 1), "one"));
    diagnostics.report(*FoldError::parse(Location::new("a.cf", 3), "three"));

    let order: Vec<(&str, u32)> = diagnostics
        .sorted()
        .into_iter()
        .map(|e| (&*e.location.file, e.location.line))
        .collect();
    assert_eq!(order, vec![("a.cf", 3), ("a.cf", 10), ("b.cf", 1)]);
}

#[test]
fn test_files_are_merged_and_rendered_in_order() {
    let mut all = Diagnostics::new();
    for (file, source) in [
        ("b.cf", "int x = @NOPE();\n"),
        ("a.cf", "int a;\n\nenum E { A, A };\n"),
    ] {
        let compilation = SourceLoader::from_string(file, source).compile().unwrap();
        all.extend(compilation.session.diagnostics);
    }
    assert_eq!(
        all.render(0),
        "a.cf:3: parse error: duplicate enumerator `A`\n\
         b.cf:1: expansion error: unknown macro `NOPE`\n"
    );
    assert_eq!(
        all.render(1),
        "a.cf:3: parse error: duplicate enumerator `A`\n... and 1 more\n"
    );
}
