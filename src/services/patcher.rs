//! Target directive lookup and source retargeting
//!
//! Source files declare the board they are written for in a brace-delimited
//! directive such as `' {$STAMP BS2}`. When the user manually picks a board
//! that does not match, the identifier literal inside the directive is
//! rewritten to that board's name so the source stays consistent with the
//! choice.

use regex::Regex;

use crate::errors::{DeployError, Result};
use crate::models::{Device, TargetProgram};

/// Directive keyword used when none is configured.
pub const DEFAULT_DIRECTIVE: &str = "$STAMP";

/// A target directive located in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDirective {
    /// Byte offset of the first character of the identifier literal
    pub target_start: usize,
    /// Byte offset of the brace closing the directive
    pub target_end: usize,
    /// Raw text between the two offsets
    pub literal: String,
}

impl TargetDirective {
    /// Board identifier the directive declares, without trailing file lists.
    pub fn declared_target(&self) -> &str {
        self.literal.split(',').next().unwrap_or_default().trim()
    }

    pub fn to_program(&self) -> TargetProgram {
        TargetProgram {
            target_start: self.target_start,
            target: Some(self.declared_target().to_string()),
        }
    }
}

/// Find the first `{<keyword> <target>}` directive in `source`.
///
/// The keyword comparison ignores ASCII case.
pub fn find_directive(source: &str, keyword: &str) -> Option<TargetDirective> {
    let pattern = Regex::new(&format!(r"(?i)\{{\s*{}\s+", regex::escape(keyword))).ok()?;

    pattern.find_iter(source).find_map(|found| {
        let target_start = found.end();
        let target_end = closing_brace(source, target_start)?;
        Some(TargetDirective {
            target_start,
            target_end,
            literal: source[target_start..target_end].to_string(),
        })
    })
}

/// Offset of the brace closing the literal that starts at `start`.
///
/// Braces opened inside the literal must be closed before the literal ends.
pub fn closing_brace(source: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, byte) in source.as_bytes().get(start..)?.iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' if depth == 0 => return Some(start + offset),
            b'}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Rewrite the identifier literal at `device.program.target_start` to the
/// device's name. Everything outside the literal is left untouched.
pub fn retarget(content: &str, device: &Device) -> Result<String> {
    let name = device
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| DeployError::Patch(format!("board on {} has no name", device.path)))?;

    if name.contains(['{', '}']) {
        return Err(DeployError::Patch(format!(
            "board name '{}' contains a brace",
            name
        )));
    }

    let program = device.program.as_ref().ok_or_else(|| {
        DeployError::Patch(format!("board '{}' carries no target program", name))
    })?;
    let start = program.target_start;

    if start > content.len() || !content.is_char_boundary(start) {
        return Err(DeployError::Patch(format!(
            "target offset {} is outside the source",
            start
        )));
    }

    let end = closing_brace(content, start).ok_or_else(|| {
        DeployError::Patch(format!("no closing brace after offset {}", start))
    })?;

    let mut patched = String::with_capacity(content.len() - (end - start) + name.len());
    patched.push_str(&content[..start]);
    patched.push_str(name);
    patched.push_str(&content[end..]);
    Ok(patched)
}
