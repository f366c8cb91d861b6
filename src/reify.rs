// SPDX-License-Identifier: Apache-2.0

//! Turns length + character-code encodings back into string values.

use log::warn;

use crate::formula::{Assignment, Value, Var};

/// Filler for string positions the formula never constrained.
pub const DEFAULT_FILL_CHAR: char = 'a';

pub fn reify_strings(assignment: &mut Assignment) {
    reify_strings_with(assignment, DEFAULT_FILL_CHAR)
}

/// For every `name__length = L` entry, stores the `L`-unit string built from
/// `name__0 .. name__{L-1}` under `name`. Helper entries are left in place.
pub fn reify_strings_with(assignment: &mut Assignment, fill: char) {
    let mut fill_buf = [0u16; 2];
    let fill_units: Vec<u16> = fill.encode_utf16(&mut fill_buf).to_vec();

    let lengths: Vec<(String, i64)> = assignment
        .iter()
        .filter_map(|(var, value)| match (var, value) {
            (Var::StringLength(name), Value::Int(len)) => Some((name.clone(), *len)),
            _ => None,
        })
        .collect();

    for (name, len) in lengths {
        if len < 0 {
            warn!("negative length {} for string {}; using 0", len, name);
        }
        let len = len.max(0) as usize;
        let mut units: Vec<u16> = Vec::with_capacity(len);
        for i in 0..len {
            match assignment.get_int(&Var::char_at(name.as_str(), i)) {
                Some(code) => match u16::try_from(code) {
                    Ok(unit) => units.push(unit),
                    Err(_) => {
                        warn!(
                            "character code {} at {}[{}] out of range; using filler",
                            code, name, i
                        );
                        units.extend_from_slice(&fill_units);
                    }
                },
                None => units.extend_from_slice(&fill_units),
            }
        }
        assignment.insert(Var::Plain(name), Value::Str(String::from_utf16_lossy(&units)));
    }
}
