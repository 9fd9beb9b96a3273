use crate::error::SelectionError;

/// Compute the binomial coefficient (n choose k) with checked arithmetic.
///
/// Search-tree leaf counts are binomial coefficients and can exceed fixed
/// width integers for moderate n, so every intermediate step is checked and
/// an explicit `Overflow` error is returned instead of a wrapped value.
///
/// # Arguments
///
/// * `n` - The size of the set to choose from.
/// * `k` - The size of the chosen subsets.
///
/// # Returns
///
/// `Ok(n choose k)`, or `Err(SelectionError::Overflow)` if the result (or an
/// intermediate product) does not fit in a u64.
pub fn binomial(n: u64, k: u64) -> Result<u64, SelectionError> {
    if k > n {
        return Ok(0);
    }

    // (n choose k) == (n choose n-k); keep the loop short.
    let r = k.min(n - k);

    // Intermediate products are kept in u128: the running value after step
    // i is (n-k+i choose i), so the product before the division can be a
    // factor n larger than the final result.
    let mut result: u128 = 1;
    for i in 1..=r as u128 {
        result = result
            .checked_mul((n - r) as u128 + i)
            .ok_or(SelectionError::Overflow { n, k })?
            / i;
    }

    u64::try_from(result).map_err(|_| SelectionError::Overflow { n, k })
}
