//! Grading of the direct-test score.
//!
//! The score itself (0-100, higher is better) comes from
//! [`DiffReport`](crate::analysis::DiffReport); this module maps it onto a
//! letter grade and the colour band used by the text report.

/// Grade thresholds (minimum score for each letter).
pub mod grades {
    pub const A_MIN: u32 = 90;
    pub const B_MIN: u32 = 80;
    pub const C_MIN: u32 = 70;
    pub const D_MIN: u32 = 60;
}

/// Colour band for a score, one per tens digit from 60 up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Green,
    Blue,
    Cyan,
    Yellow,
    Magenta,
    Red,
}

impl Band {
    pub fn for_score(score: u32) -> Self {
        match score / 10 {
            10 => Band::Green,
            9 => Band::Blue,
            8 => Band::Cyan,
            7 => Band::Yellow,
            6 => Band::Magenta,
            _ => Band::Red,
        }
    }
}

/// Determine the letter grade from a score.
pub fn grade(score: u32) -> &'static str {
    match score {
        s if s >= grades::A_MIN => "A",
        s if s >= grades::B_MIN => "B",
        s if s >= grades::C_MIN => "C",
        s if s >= grades::D_MIN => "D",
        _ => "F",
    }
}
