use crate::types::{NameBonus, Occurrence};

/// Markers wrapped around matched substrings; the rendering layer
/// replaces them with its own emphasis.
pub const HIGHLIGHT_START: &str = "$~START~$";
pub const HIGHLIGHT_END: &str = "$~END~$";

/// A scored, highlighted rendition of one searched field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    pub text: String,
    /// Accepted (non-overlapping) occurrence count, saturating at 255.
    pub hits: u8,
    pub bonus: NameBonus,
}

/// Walk occurrences in increasing start order, keep the leftmost of any
/// overlapping pair, wrap accepted matches in highlight tags, and grade
/// the first accepted occurrence by where it sits in the text.
pub fn highlight_and_rank<I>(occurrences: I, text: &str) -> Highlighted
where
    I: IntoIterator<Item = Occurrence>,
{
    let chars: Vec<char> = text.chars().collect();
    let has_comma = chars.contains(&',');

    let mut cursor = 0usize;
    let mut hits: u8 = 0;
    let mut bonus = NameBonus::None;
    let mut out = String::with_capacity(text.len());

    for occ in occurrences {
        let start = occ.starts_at as usize;
        if start < cursor {
            continue;
        }
        let len = occ.word.chars().count();
        if hits == 0 {
            bonus = if start == 0 {
                if len == chars.len() {
                    NameBonus::FullNameAlone
                } else if chars[len] == ',' {
                    NameBonus::FullName
                } else if !has_comma {
                    NameBonus::StartsNameAlone
                } else {
                    NameBonus::StartsName
                }
            } else if chars[start - 1] == ' ' {
                NameBonus::StartsWord
            } else {
                NameBonus::None
            };
        }
        hits = hits.saturating_add(1);

        out.extend(&chars[cursor..start]);
        out.push_str(HIGHLIGHT_START);
        out.extend(&chars[start..start + len]);
        out.push_str(HIGHLIGHT_END);
        cursor = start + len;
    }
    out.extend(&chars[cursor..]);

    Highlighted {
        text: out,
        hits,
        bonus,
    }
}
