use regex::Regex;

/// Normalizes raw phone strings to the canonical 11-digit form.
///
/// A canonical phone is exactly 11 ASCII digits starting with `7` or `8`.
/// Both prefixes are kept as distinct values; an export that writes
/// `8999...` and one that writes `7999...` describe different keys.
pub struct PhoneNormalizer {
    non_digit: Regex,
}

impl PhoneNormalizer {
    pub fn new() -> Self {
        Self {
            non_digit: Regex::new(r"\D").expect("static pattern"),
        }
    }

    /// Normalize one raw value. Returns `None` for anything that does not
    /// reduce to a valid 11-digit number; invalid input is a normal outcome
    /// here, not an error.
    pub fn normalize(&self, raw: Option<&str>) -> Option<String> {
        let raw = raw?;
        let mut digits = self.non_digit.replace_all(raw, "").into_owned();

        if digits.len() < 10 {
            tracing::debug!("phone too short: {:?} -> {:?}", raw, digits);
            return None;
        }

        // Local 10-digit numbers get the country prefix.
        if digits.len() == 10 {
            digits.insert(0, '7');
        }

        if digits.len() != 11 {
            tracing::debug!("phone has wrong length: {:?} -> {:?}", raw, digits);
            return None;
        }

        if !digits.starts_with('7') && !digits.starts_with('8') {
            tracing::debug!("phone has wrong prefix: {:?}", digits);
            return None;
        }

        Some(digits)
    }

    /// Element-wise `normalize` over a batch. No shared state between
    /// elements.
    pub fn normalize_batch(&self, phones: &[Option<&str>]) -> Vec<Option<String>> {
        phones.iter().map(|p| self.normalize(p.as_deref())).collect()
    }
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
