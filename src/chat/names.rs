//! Random display names for connecting clients.

use rand::seq::IndexedRandom;

const FIRST_NAMES: &[&str] = &[
    "Adam", "Alice", "Amelia", "Anna", "Arthur", "Barbara", "Benjamin", "Charles", "Chloe",
    "Daniel", "David", "Dorothy", "Edward", "Elizabeth", "Emily", "Emma", "Frank", "George",
    "Grace", "Hannah", "Harry", "Helen", "Isabel", "Jack", "James", "Joan", "John", "Joseph",
    "Julia", "Karen", "Laura", "Linda", "Lucas", "Margaret", "Maria", "Mark", "Mary", "Michael",
    "Nancy", "Oliver", "Patricia", "Paul", "Peter", "Rachel", "Richard", "Robert", "Ruth", "Sarah",
    "Sophie", "Susan", "Thomas", "Victoria", "William",
];

const LAST_NAMES: &[&str] = &[
    "Adams", "Allen", "Baker", "Brown", "Campbell", "Carter", "Clark", "Collins", "Davis",
    "Edwards", "Evans", "Garcia", "Green", "Hall", "Harris", "Hill", "Jackson", "Johnson", "Jones",
    "King", "Lee", "Lewis", "Martin", "Miller", "Mitchell", "Moore", "Nelson", "Parker", "Phillips",
    "Roberts", "Robinson", "Scott", "Smith", "Taylor", "Thomas", "Thompson", "Turner", "Walker",
    "White", "Williams", "Wilson", "Wright", "Young",
];

/// Generate a random "First Last" display name.
///
/// Names are not unique; two clients may receive the same one.
pub fn generate_display_name() -> String {
    let mut rng = rand::rng();
    let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Guest");
    let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("User");
    format!("{first} {last}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_display_name_shape() {
        for _ in 0..50 {
            let name = generate_display_name();
            let parts: Vec<&str> = name.split(' ').collect();
            assert_eq!(parts.len(), 2);
            assert!(FIRST_NAMES.contains(&parts[0]));
            assert!(LAST_NAMES.contains(&parts[1]));
        }
    }
}
