use super::guest::Guest;

/// Sample registry shown until a saved list exists.
#[must_use]
pub fn default_guests() -> Vec<Guest> {
    [
        (1, "Lady Sarah Montgomery", "1", true, true),
        (2, "Mr. Michael Chen", "2", false, false),
        (3, "Countess Emily Davis", "1", false, true),
        (4, "Lord James Wilson", "3", true, true),
        (5, "Ms. Olivia Brown", "2", false, false),
        (6, "Duke of Cambridge", "1", false, true),
    ]
    .into_iter()
    .map(|(id, name, table, checked_in, vip)| Guest {
        id,
        name: name.to_string(),
        table: table.to_string(),
        checked_in,
        vip,
    })
    .collect()
}
