use regex::Regex;
use std::sync::LazyLock;

// ISO 8601 duration as the platform encodes it: PT#H#M#S, any component absent.
static RE_ISO_DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").unwrap());

/// Parse a platform duration token into whole seconds.
///
/// Total: missing or malformed input yields 0 rather than an error, so
/// ingestion never stalls on bad duration data (a 0 simply falls below
/// the short-form floor and the item is skipped). Absurdly large
/// components saturate at `u32::MAX` instead of overflowing.
pub fn parse_duration(raw: Option<&str>) -> u32 {
    let Some(token) = raw else { return 0 };

    let Some(caps) = RE_ISO_DURATION.captures(token.trim()) else {
        return 0;
    };

    // A captured component is all digits, so a failed parse can only
    // mean it exceeds u64 and should saturate.
    let component = |i: usize| -> u64 {
        caps.get(i)
            .map(|m| m.as_str().parse().unwrap_or(u64::MAX))
            .unwrap_or(0)
    };

    let total = component(1)
        .saturating_mul(3600)
        .saturating_add(component(2).saturating_mul(60))
        .saturating_add(component(3));
    u32::try_from(total).unwrap_or(u32::MAX)
}
