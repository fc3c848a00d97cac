mod common;
use common::*;
use shiftlang::lang::Number;
use shiftlang::mach::Bindings;

#[test]
fn test_time_to_hours() {
    assert_eq!(outputs("OUTPUT 1, TimeToHours(\"01:30\")"), vec!["1.5"]);
    assert_eq!(outputs("OUTPUT 1, TimeToHours(\"00:00\")"), vec!["0"]);
    assert_eq!(outputs("OUTPUT 1, TimeToHours(\"23:45\")"), vec!["23.75"]);
}

#[test]
fn test_night_shift_overlap() {
    // A 22:00-06:00 shift against the 23:00-06:00 night window.
    let source = "\
IMPORT ShiftStart
IMPORT ShiftEnd
OUTPUT 1, TimeOverlap(ShiftStart, ShiftEnd, \"23:00\", \"06:00\")";
    let mut bindings = Bindings::new();
    bindings.set("ShiftStart", "22:00");
    bindings.set("ShiftEnd", "06:00");
    assert_eq!(outputs_with(source, &bindings), vec!["7"]);
}

#[test]
fn test_overlap_both_intervals_wrap() {
    let source = "OUTPUT 1, TimeOverlap(\"23:00\", \"06:00\", \"22:00\", \"07:00\")";
    assert_eq!(outputs(source), vec!["7"]);
}

#[test]
fn test_overlap_same_day() {
    let source = "OUTPUT 1, TimeOverlap(\"09:00\", \"17:00\", \"12:00\", \"13:30\")";
    assert_eq!(outputs(source), vec!["1.5"]);
}

#[test]
fn test_overlap_disjoint() {
    let source = "OUTPUT 1, TimeOverlap(\"09:00\", \"12:00\", \"13:00\", \"17:00\")";
    assert_eq!(outputs(source), vec!["0"]);
}

#[test]
fn test_round_fixes_rendered_digits() {
    assert_eq!(outputs("OUTPUT 1, Round(3.14159, 2)"), vec!["3.14"]);
    assert_eq!(outputs("OUTPUT 1, Round(15, 2)"), vec!["15.00"]);
    assert_eq!(outputs("OUTPUT 1, Round(2.5, 0)"), vec!["3"]);
    assert_eq!(outputs("OUTPUT 1, Round(-2.5, 0)"), vec!["-3"]);
}

#[test]
fn test_night_bonus_macro() {
    // The worked example from the crate documentation.
    let source = "\
import ShiftStart
import ShiftEnd
import NightRate
DIM night
night = TimeOverlap(ShiftStart, ShiftEnd, \"23:00\", \"06:00\")
IF night > 0 THEN OUTPUT 1, Round(night * NightRate, 2)";
    let mut bindings = Bindings::new();
    bindings.set("ShiftStart", "22:00");
    bindings.set("ShiftEnd", "06:00");
    bindings.set("NightRate", Number::from_literal("2.50").unwrap());
    assert_eq!(outputs_with(source, &bindings), vec!["17.50"]);
}
