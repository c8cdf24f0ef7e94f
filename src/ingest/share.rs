/// Parse a `"num/den"` prize share into a percentage, e.g. `"1/2"` → 50.0.
///
/// Anything that does not encode a well-formed fraction in `(0, 1]` yields
/// `None`: no slash, non-numeric parts, zero or negative numerator or
/// denominator, or a numerator larger than the denominator.
pub fn parse_share_pct(s: &str) -> Option<f64> {
    let (num, den) = s.trim().split_once('/')?;
    let num: f64 = num.trim().parse().ok()?;
    let den: f64 = den.trim().parse().ok()?;
    if !num.is_finite() || !den.is_finite() || num <= 0.0 || den <= 0.0 {
        return None;
    }
    let pct = num / den * 100.0;
    (pct > 0.0 && pct <= 100.0).then_some(pct)
}
