mod common;
use common::*;

#[test]
fn test_single_line_if() {
    assert_eq!(outputs("IF 2 > 1 THEN OUTPUT 1, 10"), vec!["10"]);
    assert_eq!(outputs("IF 1 > 2 THEN OUTPUT 1, 10"), Vec::<String>::new());
}

#[test]
fn test_single_line_if_else() {
    assert_eq!(
        outputs("IF 1 > 2 THEN OUTPUT 1, 10 ELSE OUTPUT 1, 20"),
        vec!["20"]
    );
}

#[test]
fn test_block_if() {
    let source = "\
DIM x
IF 1 THEN
x = 10
OUTPUT 1, x
ENDIF";
    assert_eq!(outputs(source), vec!["10"]);
}

#[test]
fn test_block_if_else() {
    let source = "\
IF 0 THEN
OUTPUT 1, 1
ELSE
OUTPUT 1, 2
OUTPUT 1, 3
ENDIF";
    assert_eq!(outputs(source), vec!["2", "3"]);
}

#[test]
fn test_nested_if() {
    let source = "\
IF 1 THEN
IF 0 THEN
OUTPUT 1, 1
ELSE
OUTPUT 1, 2
ENDIF
ENDIF";
    assert_eq!(outputs(source), vec!["2"]);
}

#[test]
fn test_any_nonzero_is_true() {
    assert_eq!(outputs("IF 0.5 THEN OUTPUT 1, 1"), vec!["1"]);
    assert_eq!(outputs("IF -1 THEN OUTPUT 1, 1"), vec!["1"]);
}
