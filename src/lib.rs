//! # shiftlang
//!
//! A compiler and virtual machine for shift-bonus macro scripts.
//!
//! Payroll rules for night, weekend and holiday surcharges are written as
//! short BASIC-like macros, compiled once, then evaluated for every shift
//! against host-supplied input values:
//!
//! ```text
//! import ShiftStart
//! import ShiftEnd
//! import NightRate
//! DIM night
//! night = TimeOverlap(ShiftStart, ShiftEnd, "23:00", "06:00")
//! IF night > 0 THEN OUTPUT 1, Round(night * NightRate, 2)
//! ```
//!
//! Compilation never panics and never returns `Err`: problems are reported
//! as a structured diagnostic on the compiled program. Execution reports
//! faults the same way on the execution result.
//!
//! ```
//! use shiftlang::mach::{compile, Bindings, Runtime};
//!
//! let program = compile("import Rate\nOUTPUT 1, Rate * 2");
//! assert!(program.error().is_none());
//!
//! let mut bindings = Bindings::new();
//! bindings.set("rate", 21);
//! let result = Runtime::new(&program, &bindings).execute();
//! assert!(result.success());
//! assert_eq!(result.messages()[0].value, "42");
//! ```

pub mod lang;
pub mod mach;
