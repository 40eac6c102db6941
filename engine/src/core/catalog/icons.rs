//! Display icon heuristics for catalog entries.

use std::sync::LazyLock;

use regex::Regex;

/// Keyword patterns checked in order; first match wins.
static KEYWORD_ICONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"blur|defocus|soft", "droplet"),
        (r"glitch|distort|noise", "zap"),
        (r"shake|vibrat|jitter|bounce", "activity"),
        (r"light|glow|flash|flare|shine", "sun"),
        (r"film|retro|vintage|vhs|grain", "film"),
        (r"colou?r|tone|hue|tint", "palette"),
        (r"zoom|scale", "zoom-in"),
        (r"spin|rotat|swing|twist", "rotate-cw"),
        (r"fade|dissolve|mix", "layers"),
        (r"slide|wipe|push|swipe", "arrow-right"),
        (r"heart|love", "heart"),
        (r"star|sparkl|glitter", "star"),
        (r"snow|rain|cloud|fog", "cloud"),
    ]
    .into_iter()
    .filter_map(|(pattern, icon)| {
        Regex::new(&format!("(?i){pattern}"))
            .ok()
            .map(|re| (re, icon))
    })
    .collect()
});

/// Picks a display icon from an entry's name, falling back on its type tag.
pub fn icon_for(name: &str, type_tag: Option<&str>) -> &'static str {
    if let Some((_, icon)) = KEYWORD_ICONS.iter().find(|(re, _)| re.is_match(name)) {
        return icon;
    }
    match type_tag.map(str::to_ascii_lowercase).as_deref() {
        Some("in") => "log-in",
        Some("out") => "log-out",
        Some("group") => "repeat",
        Some("transition") => "shuffle",
        _ => "sparkles",
    }
}
