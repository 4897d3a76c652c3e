//! Random display names handed out on connect.

use rand::seq::IndexedRandom;

/// Pool of first names. Duplicates across users are allowed: identity is
/// the connection id, the name is only for display.
const FIRST_NAMES: &[&str] = &[
    "Ada", "Alma", "Amos", "Anya", "Arlo", "Bea", "Boris", "Cleo", "Dario",
    "Della", "Edgar", "Elsa", "Emil", "Esme", "Felix", "Flora", "Gus",
    "Hana", "Hugo", "Ines", "Ivan", "Jada", "Jonas", "Kai", "Kira", "Leon",
    "Lina", "Luca", "Mae", "Mara", "Milo", "Nadia", "Nico", "Nora", "Omar",
    "Opal", "Otto", "Paz", "Pia", "Quinn", "Rafa", "Rosa", "Rufus", "Sana",
    "Silas", "Tess", "Theo", "Uma", "Vera", "Viggo", "Wren", "Xavi", "Yara",
    "Yusuf", "Zane", "Zoe",
];

/// Picks a random first name.
pub fn random_name() -> String {
    let mut rng = rand::rng();
    FIRST_NAMES
        .choose(&mut rng)
        .copied()
        .unwrap_or("Player")
        .to_string()
}
