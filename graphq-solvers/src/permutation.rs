//! Index-to-permutation decoding for exact tour enumeration
//!
//! Permutation `k` of `0..n` is decoded from the factorial-base digits of
//! `k` (Lehmer code), so iterating `k` over `0..n!` visits permutations in
//! lexicographic order without recursion or stored state.

/// `n!`, or `None` when it overflows a u64
pub fn factorial(n: usize) -> Option<u64> {
    (1..=n as u64).try_fold(1u64, |acc, k| acc.checked_mul(k))
}

/// Write the `rank`-th lexicographic permutation of `0..out.len()` into `out`
///
/// `pool` is scratch space reused across calls. `rank` must be below
/// `out.len()!`.
pub fn decode_permutation(mut rank: u64, pool: &mut Vec<usize>, out: &mut [usize]) {
    let n = out.len();
    pool.clear();
    pool.extend(0..n);

    for (pos, slot) in out.iter_mut().enumerate() {
        let remaining = n - pos - 1;
        let block = factorial(remaining).unwrap_or(u64::MAX);
        let digit = (rank / block) as usize;
        rank %= block;
        *slot = pool.remove(digit);
    }
}
