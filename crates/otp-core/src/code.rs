//! Conversions between code strings and digit slots.

/// One slot per field; `None` means the field is empty.
pub type Slots = Vec<Option<char>>;

/// Splits a code string into filled slots (absent code yields no slots).
pub fn code_to_slots(code: Option<&str>) -> Slots {
    code.map(|c| c.chars().map(Some).collect())
        .unwrap_or_default()
}

/// Joins the filled slots into a code string, skipping empty ones.
pub fn join_slots(slots: &[Option<char>]) -> String {
    slots.iter().flatten().collect()
}

/// Number of filled slots.
pub fn filled_count(slots: &[Option<char>]) -> usize {
    slots.iter().filter(|slot| slot.is_some()).count()
}

/// Drops empty slots from the end so the length is one past the highest filled index.
pub fn prune_trailing_empty(slots: &mut Slots) {
    while matches!(slots.last(), Some(None)) {
        slots.pop();
    }
}

/// Keeps only ASCII digits from `text`.
pub fn strip_non_digits(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(char::is_ascii_digit)
}

/// Returns true if `text` is exactly `len` ASCII digits.
pub fn is_complete_code(text: &str, len: usize) -> bool {
    text.len() == len && text.bytes().all(|b| b.is_ascii_digit())
}
