use chrono::{Local, NaiveDate, Utc};

const AUTO_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const AUTO_ID_LEN: usize = 20;

pub(crate) fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Calendar date in the browser's local timezone.
pub(crate) fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Moves `shown` to `now` when the calendar day changed. Returns whether it
/// moved, so callers only notify on an actual rollover.
pub(crate) fn roll_date(shown: &mut NaiveDate, now: NaiveDate) -> bool {
    if *shown == now {
        return false;
    }
    *shown = now;
    true
}

/// Document id in the same shape the hosted store generates (20 alphanumerics).
pub(crate) fn new_document_id() -> String {
    let mut buf = [0u8; AUTO_ID_LEN];
    if getrandom::getrandom(&mut buf).is_err() {
        // Entropy unavailable; fall back to the clock so ids stay unique per session.
        let seed = now_ms().to_le_bytes();
        for (i, b) in buf.iter_mut().enumerate() {
            *b = seed[i % seed.len()].wrapping_add(i as u8).wrapping_mul(31);
        }
    }
    auto_id_from_bytes(&buf)
}

fn auto_id_from_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| AUTO_ID_ALPHABET[(*b as usize) % AUTO_ID_ALPHABET.len()] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_date_only_moves_on_a_new_day() {
        let mut shown = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(!roll_date(&mut shown, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
        assert!(roll_date(&mut shown, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()));
        assert_eq!(shown, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }

    #[test]
    fn test_auto_id_alphabet_and_len() {
        let id = auto_id_from_bytes(&[0, 1, 61, 62, 255, 10, 20, 30, 40, 50, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(id.starts_with("AB9A"));
    }

    #[test]
    fn test_new_document_ids_differ() {
        let a = new_document_id();
        let b = new_document_id();
        assert_eq!(a.len(), 20);
        assert_ne!(a, b);
    }
}
