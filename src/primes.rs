//! Prime sizing for the bucket array.

/// Returns true when `n` is prime. Trial division over `6k ± 1`.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i: usize = 5;
    // i <= n / i avoids overflowing i * i near usize::MAX
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Smallest prime `>= n`, or `None` if that prime does not fit in `usize`.
/// Values below 2 map to 2.
pub fn checked_next_prime(n: usize) -> Option<usize> {
    let mut candidate = n.max(2);
    loop {
        if is_prime(candidate) {
            return Some(candidate);
        }
        candidate = candidate.checked_add(1)?;
    }
}

/// Smallest prime `>= n`.
///
/// # Panics
/// If no prime `>= n` is representable as `usize`.
pub fn next_prime(n: usize) -> usize {
    match checked_next_prime(n) {
        Some(p) => p,
        None => panic!("no prime >= {n} fits in usize"),
    }
}
