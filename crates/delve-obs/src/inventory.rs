//! Inventory lookups.

use delve_core::Snapshot;

/// Letter of the first inventory item whose description contains `name`.
///
/// Inventory slots are scanned in order and the scan stops at the first
/// empty slot, which marks the end of the listing.
pub fn key_in_inventory(snapshot: &Snapshot, name: &str) -> Option<u8> {
    snapshot
        .inv_letters()
        .iter()
        .zip(snapshot.inv_strs())
        .take_while(|(_, line)| !line.is_empty())
        .find(|(_, line)| line.contains(name))
        .map(|(&letter, _)| letter)
}
