//! Parsing of Go coverage profiles (`go test -coverprofile`).

use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use super::ProfileError;

lazy_static! {
    /// `file:startLine.startCol,endLine.endCol numStmt count`
    static ref BLOCK_LINE: Regex =
        Regex::new(r"^(.+):([0-9]+)\.([0-9]+),([0-9]+)\.([0-9]+) ([0-9]+) ([0-9]+)$").unwrap();
}

const MODE_PREFIX: &str = "mode: ";

/// How block counts were recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Set,
    Count,
    Atomic,
}

impl Mode {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "set" => Some(Mode::Set),
            "count" => Some(Mode::Count),
            "atomic" => Some(Mode::Atomic),
            _ => None,
        }
    }
}

/// One instrumented block of statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileBlock {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
    pub num_stmt: usize,
    pub count: u64,
}

/// Coverage blocks of one source file.
#[derive(Debug, Clone)]
pub struct Profile {
    /// File as named in the profile (usually an import path).
    pub file_name: String,
    pub mode: Mode,
    /// Sorted by start position, duplicates merged.
    pub blocks: Vec<ProfileBlock>,
}

/// A span edge in the source, as a byte offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub offset: usize,
    pub start: bool,
    pub count: u64,
    /// Count scaled to 0..=1 against the file's hottest block.
    pub norm: f64,
}

/// Read and parse the profile at `path`.
pub fn parse_file(path: &Path) -> Result<Vec<Profile>, ProfileError> {
    let content = fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}

/// Parse profile text into one [`Profile`] per file, sorted by file name.
pub fn parse(content: &str) -> Result<Vec<Profile>, ProfileError> {
    let mut lines = content.lines().enumerate();

    let mode = match lines.next() {
        Some((_, first)) => first
            .strip_prefix(MODE_PREFIX)
            .and_then(Mode::parse)
            .ok_or(ProfileError::MissingMode)?,
        None => return Err(ProfileError::Empty),
    };

    let mut profiles: Vec<Profile> = Vec::new();
    for (index, line) in lines {
        if line.is_empty() {
            continue;
        }
        let caps = BLOCK_LINE.captures(line).ok_or_else(|| ProfileError::Malformed {
            line: index + 1,
            text: line.to_string(),
        })?;
        let number = |i: usize| -> Result<u64, ProfileError> {
            caps[i].parse::<u64>().map_err(|_| ProfileError::Malformed {
                line: index + 1,
                text: line.to_string(),
            })
        };

        let block = ProfileBlock {
            start_line: number(2)? as usize,
            start_col: number(3)? as usize,
            end_line: number(4)? as usize,
            end_col: number(5)? as usize,
            num_stmt: number(6)? as usize,
            count: number(7)?,
        };

        let file_name = &caps[1];
        match profiles.iter_mut().find(|p| p.file_name == file_name) {
            Some(profile) => profile.blocks.push(block),
            None => profiles.push(Profile {
                file_name: file_name.to_string(),
                mode,
                blocks: vec![block],
            }),
        }
    }

    for profile in &mut profiles {
        profile.merge_blocks()?;
    }
    profiles.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(profiles)
}

impl Profile {
    /// Sort blocks and fold repeated ones (profiles from several test binaries).
    fn merge_blocks(&mut self) -> Result<(), ProfileError> {
        self.blocks
            .sort_by_key(|b| (b.start_line, b.start_col, b.end_line, b.end_col));

        let mut merged: Vec<ProfileBlock> = Vec::with_capacity(self.blocks.len());
        for block in self.blocks.drain(..) {
            match merged.last_mut() {
                Some(last)
                    if (last.start_line, last.start_col, last.end_line, last.end_col)
                        == (block.start_line, block.start_col, block.end_line, block.end_col) =>
                {
                    if last.num_stmt != block.num_stmt {
                        return Err(ProfileError::InconsistentBlock {
                            file: self.file_name.clone(),
                            line: block.start_line,
                        });
                    }
                    if self.mode == Mode::Set {
                        last.count = last.count.max(block.count);
                    } else {
                        last.count += block.count;
                    }
                }
                _ => merged.push(block),
            }
        }
        self.blocks = merged;
        Ok(())
    }

    /// Percentage of statements executed at least once.
    pub fn percent_covered(&self) -> f64 {
        let mut total = 0usize;
        let mut covered = 0usize;
        for block in &self.blocks {
            total += block.num_stmt;
            if block.count > 0 {
                covered += block.num_stmt;
            }
        }
        if total == 0 {
            return 0.0;
        }
        covered as f64 / total as f64 * 100.0
    }

    /// Start and end boundaries of every block within `src`, in offset order.
    pub fn boundaries(&self, src: &[u8]) -> Vec<Boundary> {
        let max = self.blocks.iter().map(|b| b.count).max().unwrap_or(0);
        let divisor = (max as f64).ln();

        let boundary = |offset: usize, start: bool, count: u64| {
            let norm = if !start || count == 0 {
                0.0
            } else if max <= 1 {
                // set mode: a flat heat map
                0.8
            } else {
                (count as f64).ln() / divisor
            };
            Boundary {
                offset,
                start,
                count,
                norm,
            }
        };

        let mut boundaries = Vec::new();
        // Columns in profiles are one past what a plain walk would give.
        let (mut line, mut col) = (1usize, 2usize);
        let (mut si, mut bi) = (0usize, 0usize);
        while si < src.len() && bi < self.blocks.len() {
            let b = &self.blocks[bi];
            if b.start_line == line && b.start_col == col {
                boundaries.push(boundary(si, true, b.count));
            }
            if (b.end_line == line && b.end_col == col) || line > b.end_line {
                boundaries.push(boundary(si, false, 0));
                bi += 1;
                continue;
            }
            if src[si] == b'\n' {
                line += 1;
                col = 0;
            }
            col += 1;
            si += 1;
        }

        // Stable: equal offsets keep emission order.
        boundaries.sort_by_key(|b| b.offset);
        boundaries
    }
}
