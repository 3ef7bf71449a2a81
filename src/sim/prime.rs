//! Prime classification
//!
//! Pure number theory used by the scoring engine. `is_prime` decides the
//! tap outcome; `prime_factors` only feeds the feedback message on wrong
//! taps and never overrides the classification.

/// Trial division primality test with a 6k±1 wheel. O(√n).
pub fn is_prime(n: u32) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5u32;
    while i * i <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Prime factorization, ascending with repetition.
///
/// `prime_factors(12) == [2, 2, 3]`; a prime returns itself; 0 and 1
/// return an empty vec.
pub fn prime_factors(n: u32) -> Vec<u32> {
    let mut factors = Vec::new();
    let mut n = n;
    let mut d = 2u32;
    while d * d <= n {
        while n % d == 0 {
            factors.push(d);
            n /= d;
        }
        d += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Reference sieve of Eratosthenes
    fn sieve(limit: usize) -> Vec<bool> {
        let mut prime = vec![true; limit + 1];
        prime[0] = false;
        if limit >= 1 {
            prime[1] = false;
        }
        let mut i = 2;
        while i * i <= limit {
            if prime[i] {
                let mut j = i * i;
                while j <= limit {
                    prime[j] = false;
                    j += i;
                }
            }
            i += 1;
        }
        prime
    }

    #[test]
    fn test_matches_sieve_up_to_10000() {
        let reference = sieve(10_000);
        for n in 1..=10_000u32 {
            assert_eq!(
                is_prime(n),
                reference[n as usize],
                "disagreement with sieve at {n}"
            );
        }
    }

    #[test]
    fn test_small_edge_cases() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(4));
    }

    #[test]
    fn test_factors_of_prime_is_itself() {
        for p in [2u32, 3, 7, 97, 7919] {
            assert_eq!(prime_factors(p), vec![p]);
        }
    }

    #[test]
    fn test_factors_trivial_inputs() {
        assert!(prime_factors(0).is_empty());
        assert!(prime_factors(1).is_empty());
        assert_eq!(prime_factors(9), vec![3, 3]);
        assert_eq!(prime_factors(12), vec![2, 2, 3]);
    }

    proptest! {
        #[test]
        fn prop_factor_product_reconstructs_n(n in 2u32..50_000) {
            let factors = prime_factors(n);
            let product: u32 = factors.iter().product();
            prop_assert_eq!(product, n);
            for f in &factors {
                prop_assert!(is_prime(*f), "non-prime factor {} of {}", f, n);
            }
        }

        #[test]
        fn prop_factors_ascending(n in 2u32..50_000) {
            let factors = prime_factors(n);
            prop_assert!(factors.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
