//! Duplicate guest-name resolution
//!
//! Colliding names receive a numeric suffix: against existing guests of the
//! event and against earlier rows of the same import. "Alice" colliding
//! with existing {"Alice", "Alice 3"} becomes "Alice 4": the next suffix
//! is always one past the maximum in use, never the first unused integer,
//! so previously deleted suffixes are not resurrected.
//!
//! Pure function of (existing-name snapshot, ordered new names). The
//! working set grows as names are assigned, which numbers in-batch
//! duplicates in input order. Concurrent imports for the same event read
//! independent snapshots and can mint the same suffix; there is no
//! per-event lock.

use crate::models::NormalizedGuest;

/// Resolve collision-safe names for an ordered guest batch
///
/// `existing_names` is the event's name index, read once before the call.
pub fn resolve_duplicates(
    guests: Vec<NormalizedGuest>,
    existing_names: Vec<String>,
) -> Vec<NormalizedGuest> {
    let mut known_names = existing_names;
    let mut resolved = Vec::with_capacity(guests.len());

    for mut guest in guests {
        let name = collision_free_name(&guest.guest_name, &known_names);
        known_names.push(name.clone());
        guest.guest_name = name;
        resolved.push(guest);
    }

    resolved
}

/// Assign a collision-free name for one base name
///
/// A known name collides when it equals the base exactly (suffix 0) or
/// matches `"<base> <N>"` for a positive integer N. The result appends
/// max(N) + 1; non-colliding names pass through unchanged.
pub fn collision_free_name(guest_name: &str, known_names: &[String]) -> String {
    let base = guest_name.trim();

    let max_suffix = known_names
        .iter()
        .filter_map(|known| collision_suffix(base, known))
        .max();

    match max_suffix {
        Some(n) => format!("{} {}", base, n + 1),
        None => base.to_string(),
    }
}

/// Suffix of a colliding known name: 0 for an exact match, N for
/// `"<base> <N>"`, None when the name does not collide
fn collision_suffix(base: &str, known: &str) -> Option<u32> {
    if known == base {
        return Some(0);
    }

    let rest = known.strip_prefix(base)?.strip_prefix(' ')?;
    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    rest.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest(name: &str) -> NormalizedGuest {
        NormalizedGuest {
            guest_name: name.to_string(),
            table_number: "1".to_string(),
            seat_number: None,
        }
    }

    fn names(guests: &[NormalizedGuest]) -> Vec<&str> {
        guests.iter().map(|g| g.guest_name.as_str()).collect()
    }

    #[test]
    fn test_non_colliding_names_pass_through() {
        let resolved = resolve_duplicates(
            vec![guest("Alice"), guest("Bob")],
            vec!["Carol".to_string()],
        );
        assert_eq!(names(&resolved), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_in_batch_duplicates_numbered_in_order() {
        let resolved = resolve_duplicates(
            vec![guest("Alice"), guest("Alice"), guest("Bob")],
            vec!["Alice".to_string()],
        );
        assert_eq!(names(&resolved), vec!["Alice 1", "Alice 2", "Bob"]);
    }

    #[test]
    fn test_next_suffix_is_max_plus_one() {
        let resolved = resolve_duplicates(
            vec![guest("Alice")],
            vec!["Alice".to_string(), "Alice 3".to_string()],
        );
        assert_eq!(names(&resolved), vec!["Alice 4"]);
    }

    #[test]
    fn test_suffixed_name_without_base_still_collides() {
        // Only "Alice 3" persisted (base row deleted): next is still 4
        let resolved = resolve_duplicates(vec![guest("Alice")], vec!["Alice 3".to_string()]);
        assert_eq!(names(&resolved), vec!["Alice 4"]);
    }

    #[test]
    fn test_prefix_names_do_not_collide() {
        // "Alicette" and "Alice Dupont" share a prefix but are not
        // "<Alice> <N>" matches
        let resolved = resolve_duplicates(
            vec![guest("Alice")],
            vec!["Alicette".to_string(), "Alice Dupont".to_string()],
        );
        assert_eq!(names(&resolved), vec!["Alice"]);
    }

    #[test]
    fn test_whitespace_trimmed_before_matching() {
        let resolved = resolve_duplicates(vec![guest("  Alice ")], vec!["Alice".to_string()]);
        assert_eq!(names(&resolved), vec!["Alice 1"]);
    }

    #[test]
    fn test_determinism_for_identical_input() {
        let existing = vec!["Alice".to_string(), "Alice 2".to_string()];
        let batch = vec![guest("Alice"), guest("Bob"), guest("Alice")];

        let first = resolve_duplicates(batch.clone(), existing.clone());
        let second = resolve_duplicates(batch, existing);
        assert_eq!(names(&first), names(&second));
        assert_eq!(names(&first), vec!["Alice 3", "Bob", "Alice 4"]);
    }

    #[test]
    fn test_other_fields_untouched() {
        let mut input = guest("Alice");
        input.table_number = "Table VIP".to_string();
        input.seat_number = Some("4".to_string());

        let resolved = resolve_duplicates(vec![input], vec!["Alice".to_string()]);
        assert_eq!(resolved[0].guest_name, "Alice 1");
        assert_eq!(resolved[0].table_number, "Table VIP");
        assert_eq!(resolved[0].seat_number, Some("4".to_string()));
    }
}
