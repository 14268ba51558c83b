//! Prime sizing for bucket arrays.
//!
//! Bucket counts are always prime so that hash functions whose outputs share
//! small factors still spread across every bucket under `hash % capacity`.
//! Primality is checked by trial division, which only runs when a table is
//! created or grows.

/// Returns `true` if `n` is prime.
///
/// `0` and `1` are not prime; `2` is.
///
/// # Examples
///
/// ```rust
/// use chain_hash::prime::is_prime;
///
/// assert!(is_prime(2));
/// assert!(is_prime(13));
/// assert!(!is_prime(1));
/// assert!(!is_prime(15));
/// ```
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut divisor = 3usize;
    // `divisor <= n / divisor` is `divisor * divisor <= n` without overflow.
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }

    true
}

/// Returns the smallest prime `>= n`, or `None` if that prime does not fit in
/// `usize`.
///
/// Inputs below 2 round up to 2.
pub fn checked_next_prime(n: usize) -> Option<usize> {
    let mut candidate = n.max(2);
    loop {
        if is_prime(candidate) {
            return Some(candidate);
        }
        candidate = candidate.checked_add(1)?;
    }
}

/// Returns the smallest prime `>= n`.
///
/// Returns `n` itself when it is already prime. Inputs below 2 (which have no
/// sensible bucket count) round up to 2.
///
/// # Panics
///
/// Panics if no prime `>= n` fits in `usize`. Use [`checked_next_prime`] to
/// handle that case.
///
/// # Examples
///
/// ```rust
/// use chain_hash::prime::next_prime;
///
/// assert_eq!(next_prime(11), 11);
/// assert_eq!(next_prime(12), 13);
/// assert_eq!(next_prime(1), 2);
/// ```
pub fn next_prime(n: usize) -> usize {
    match checked_next_prime(n) {
        Some(prime) => prime,
        None => panic!("no prime >= {n} fits in usize"),
    }
}
