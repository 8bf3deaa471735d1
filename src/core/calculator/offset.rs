//! Per-equipment annual offset.
//!
//! Annual PMs completed in the same week would otherwise come due in the
//! same week forever. Each equipment gets a fixed shift in −30..=+30 days,
//! added to its next annual due date at completion time.

use sha2::{Digest, Sha256};

const SPREAD: u64 = 61;
const HALF: i64 = 30;

/// Deterministic offset for `equipment_id`.
///
/// Ids ending in digits (`E-0100`, `PUMP17`) use that number mod 61, minus 30.
/// Other ids use the first 8 bytes of SHA-256(id) as a big-endian u64 instead.
pub fn annual_offset(equipment_id: &str) -> i64 {
    let id = equipment_id.trim();
    let seed = numeric_suffix(id).unwrap_or_else(|| sha256_seed(id));
    (seed % SPREAD) as i64 - HALF
}

/// Trailing digits of `id`, reduced mod 61 one digit at a time so any
/// length fits.
fn numeric_suffix(id: &str) -> Option<u64> {
    let digits: Vec<u64> = id
        .chars()
        .rev()
        .map_while(|c| c.to_digit(10))
        .map(u64::from)
        .collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.iter().rev().fold(0, |acc, d| (acc * 10 + d) % SPREAD))
}

fn sha256_seed(id: &str) -> u64 {
    let digest = Sha256::digest(id.as_bytes());
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_suffix_drives_offset() {
        assert_eq!(annual_offset("E-0100"), (100 % 61) - 30);
        assert_eq!(annual_offset("E-0030"), 0);
        assert_eq!(annual_offset("PUMP0"), -30);
        assert_eq!(annual_offset("X60"), 30);
        assert_eq!(annual_offset("X61"), -30);
    }

    #[test]
    fn fallback_is_stable_and_bounded() {
        let a = annual_offset("COMPRESSOR-A");
        assert_eq!(a, annual_offset("COMPRESSOR-A"));
        for id in ["A", "B", "ZZ-TOP", "line-b-press", "Ünïcode"] {
            let o = annual_offset(id);
            assert!((-30..=30).contains(&o), "{id} -> {o}");
        }
    }

    #[test]
    fn long_digit_runs_use_the_whole_suffix() {
        // 10^18 mod 61 = 41
        assert_eq!(annual_offset("SN-1000000000000000000"), 11);
        assert_eq!(annual_offset("SN-123456789012345678901234567890"), -10);
    }
}
