//! # Game Mathematics
//!
//! Level-scaling tables and small numeric helpers.

/// A level-scaling table: `(level threshold, value)` pairs sorted by threshold.
pub type StepTable = [(u32, u32)];

/// Evaluates a step function at the given dungeon level.
///
/// Returns the value of the last entry whose threshold is `<= level`, or 0
/// when the level is below every threshold.
///
/// # Examples
///
/// ```
/// use gloom::step_value;
///
/// let table = [(1, 2), (4, 3), (6, 5)];
/// assert_eq!(step_value(&table, 1), 2);
/// assert_eq!(step_value(&table, 5), 3);
/// assert_eq!(step_value(&table, 9), 5);
/// assert_eq!(step_value(&[(3, 15)], 2), 0);
/// ```
pub fn step_value(table: &StepTable, level: u32) -> u32 {
    table
        .iter()
        .take_while(|(threshold, _)| *threshold <= level)
        .last()
        .map(|(_, value)| *value)
        .unwrap_or(0)
}

/// Upper-cases the first character of a message fragment.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
