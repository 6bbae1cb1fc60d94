//! Suggested values for the source and medium dropdowns

/// Platforms offered for `utm_source`
pub const SOURCE_OPTIONS: &[&str] = &[
    "adsplay",
    "google",
    "linkedin",
    "meta",
    "tiktok",
    "twitter",
    "audio",
    "vertical",
    "youtube",
    "instagram-stories",
    "instagram-feed",
    "facebook",
    "nbids",
    "whatsapp",
    "hands",
    "impresso",
    "mkt_cloud",
    "immakers",
];

/// Media offered for `utm_medium`
pub const MEDIUM_OPTIONS: &[&str] = &[
    "cpa", "cpc", "cpi", "cpm", "cpr", "lc", "mva", "mvao", "mvo", "mxcon", "pimp", "roas", "uni",
    "cpe", "cpv", "social", "offline", "email", "whatsapp", "sms", "cpl",
];

/// Preset list by name: "source" or "medium"
pub fn options_for(kind: &str) -> Option<&'static [&'static str]> {
    match kind {
        "source" => Some(SOURCE_OPTIONS),
        "medium" => Some(MEDIUM_OPTIONS),
        _ => None,
    }
}

/// Case-insensitive substring filter, keeping the original order
pub fn filter_options<'a>(options: &[&'a str], query: &str) -> Vec<&'a str> {
    let needle = query.to_lowercase();
    options
        .iter()
        .copied()
        .filter(|option| option.to_lowercase().contains(&needle))
        .collect()
}
