//! Brazilian CPF normalization and check-digit validation.

/// Keeps only ASCII digits.
pub fn normalize(cpf: &str) -> String {
    cpf.chars().filter(char::is_ascii_digit).collect()
}

/// Computes one mod-11 check digit over `digits`, weights starting at `first_weight`.
fn check_digit(digits: &[u32], first_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip((2..=first_weight).rev())
        .map(|(d, w)| d * w)
        .sum();
    let r = 11 - (sum % 11);
    if r >= 10 {
        0
    } else {
        r
    }
}

pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = normalize(cpf)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();
    if digits.len() != 11 {
        return false;
    }
    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }
    check_digit(&digits[..9], 10) == digits[9] && check_digit(&digits[..10], 11) == digits[10]
}
