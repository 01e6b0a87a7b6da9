//! Bounty string parsing.
//!
//! Catalog sources report bounties in wildly inconsistent shapes: `"$2,500"`,
//! `"2.5k"`, `"1,000-2,000"`, `"free"`, `"-"`, or nothing at all. This module
//! collapses all of them into a comparable amount or "no bounty".

/// Phrases that mean "no bounty" regardless of surrounding text.
const NO_BOUNTY_WORDS: &[&str] = &["free", "unknown", "n/a", "no bounty"];

/// Parse a raw bounty string into a whole-dollar amount.
///
/// Returns `None` when no positive monetary amount can be determined: absent
/// or blank input, the `-` placeholder, "free"/"unknown"-style text, parse
/// failures, and amounts that round to zero. Ranges like `500-1000` are
/// valued at their ceiling. Never panics.
#[must_use]
pub fn parse_bounty(raw: Option<&str>) -> Option<u64> {
    let raw = raw?.trim();
    if raw.is_empty() || raw == "-" {
        return None;
    }

    let lowered = raw.to_lowercase();
    if NO_BOUNTY_WORDS.iter().any(|word| lowered.contains(word)) {
        return None;
    }

    // Strip whitespace, currency symbols, and thousands separators.
    let cleaned: String = lowered
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '$' | '€' | '£' | '₹' | ','))
        .collect();

    // "2.5k" style shorthand.
    if let Some(stem) = cleaned.strip_suffix('k')
        && !stem.is_empty()
        && stem.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        return round_positive(stem.parse::<f64>().ok()? * 1000.0);
    }

    // Ranges are valued at their ceiling; unparseable sides are discarded.
    if cleaned.contains('-') {
        let ceiling = cleaned
            .split('-')
            .filter_map(|part| digits_and_dots(part).parse::<f64>().ok())
            .fold(None, |best: Option<f64>, n| Some(best.map_or(n, |b| b.max(n))));
        if let Some(n) = ceiling {
            return round_positive(n);
        }
    }

    round_positive(digits_and_dots(&cleaned).parse::<f64>().ok()?)
}

fn digits_and_dots(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_positive(n: f64) -> Option<u64> {
    if !n.is_finite() {
        return None;
    }
    let rounded = n.round();
    if rounded <= 0.0 { None } else { Some(rounded as u64) }
}

#[cfg(test)]
mod tests {
    use super::parse_bounty;

    #[test]
    fn plain_amounts() {
        assert_eq!(parse_bounty(Some("500")), Some(500));
        assert_eq!(parse_bounty(Some("$2,500")), Some(2500));
        assert_eq!(parse_bounty(Some("€1.500")), Some(2)); // "1.500" parses as 1.5
        assert_eq!(parse_bounty(Some("  $750  ")), Some(750));
        assert_eq!(parse_bounty(Some("₹10000")), Some(10000));
    }

    #[test]
    fn k_shorthand() {
        assert_eq!(parse_bounty(Some("2.5k")), Some(2500));
        assert_eq!(parse_bounty(Some("10k")), Some(10000));
        assert_eq!(parse_bounty(Some("$1K")), Some(1000));
    }

    #[test]
    fn ranges_take_the_ceiling() {
        assert_eq!(parse_bounty(Some("1,000-2,000")), Some(2000));
        assert_eq!(parse_bounty(Some("500-1000")), Some(1000));
        assert_eq!(parse_bounty(Some("$500 - $250")), Some(500));
        // One unparseable side is discarded, not fatal.
        assert_eq!(parse_bounty(Some("??-750")), Some(750));
    }

    #[test]
    fn no_bounty_sentinels() {
        assert_eq!(parse_bounty(None), None);
        assert_eq!(parse_bounty(Some("")), None);
        assert_eq!(parse_bounty(Some("   ")), None);
        assert_eq!(parse_bounty(Some("-")), None);
        assert_eq!(parse_bounty(Some("free")), None);
        assert_eq!(parse_bounty(Some("Free")), None);
        assert_eq!(parse_bounty(Some("Unknown")), None);
        assert_eq!(parse_bounty(Some("N/A")), None);
        assert_eq!(parse_bounty(Some("No Bounty")), None);
    }

    #[test]
    fn zero_means_no_bounty() {
        assert_eq!(parse_bounty(Some("0")), None);
        assert_eq!(parse_bounty(Some("$0")), None);
        assert_eq!(parse_bounty(Some("0.0")), None);
    }

    #[test]
    fn garbage_is_recovered_as_none() {
        assert_eq!(parse_bounty(Some("swag only")), None);
        assert_eq!(parse_bounty(Some("1.2.3")), None);
        assert_eq!(parse_bounty(Some("kkk")), None);
        assert_eq!(parse_bounty(Some("$")), None);
    }

    #[test]
    fn rounding_is_to_nearest_integer() {
        assert_eq!(parse_bounty(Some("2.4")), Some(2));
        assert_eq!(parse_bounty(Some("2.5")), Some(3));
        assert_eq!(parse_bounty(Some("0.4")), None); // rounds to zero
    }
}
