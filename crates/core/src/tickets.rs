//! Parking ticket number generation.

use rand::Rng;

use crate::types::Timestamp;

/// Characters used for the random ticket suffix. Excludes ambiguous
/// glyphs (0/O, 1/I/L) since attendants read these out loud.
const TICKET_CHARSET: &[u8] = b"23456789ABCDEFGHJKMNPQRSTUVWXYZ";

/// Length of the random ticket suffix.
const TICKET_SUFFIX_LEN: usize = 6;

/// Generate a ticket number of the form `PK-YYYYMMDD-XXXXXX`.
///
/// The random suffix makes collisions unlikely but not impossible; the
/// `uq_vehicle_entries_ticket` unique index is the actual guarantee, and
/// insertion retries once with a fresh number on a collision.
pub fn generate_ticket_number(now: Timestamp) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..TICKET_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..TICKET_CHARSET.len());
            TICKET_CHARSET[idx] as char
        })
        .collect();
    format!("PK-{}-{}", now.format("%Y%m%d"), suffix)
}
