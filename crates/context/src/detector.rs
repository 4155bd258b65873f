//! Display-context detection.
//!
//! Classifies a sample of [`EnvironmentSignals`] into a
//! [`PresentationContext`]. First match wins:
//!
//! 1. Active fullscreen element -> Fullscreen
//! 2. Standalone media query, installed flag, or the mobile heuristic -> Standalone
//! 3. Fullscreen media query -> Fullscreen
//! 4. Browser media query -> Browser
//! 5. Browser
//!
//! The fullscreen API outranks media queries because the latter can lag
//! behind the real state.

use crate::provider::ContextSource;
use crate::state::{EnvironmentSignals, PresentationContext};

/// User-agent fragments that mark a mobile browser.
pub const MOBILE_UA_MARKERS: &[&str] = &[
    "android",
    "iphone",
    "ipad",
    "ipod",
    "mobile",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Classify a single environment sample.
pub fn detect(signals: &EnvironmentSignals) -> PresentationContext {
    if signals.fullscreen_element {
        return PresentationContext::Fullscreen;
    }

    let media = signals.display_mode.unwrap_or_default();

    if media.standalone || signals.installed_flag == Some(true) || looks_installed(signals) {
        return PresentationContext::Standalone;
    }

    if media.fullscreen {
        return PresentationContext::Fullscreen;
    }

    PresentationContext::Browser
}

/// Sample the source and classify it.
pub fn detect_from(source: &dyn ContextSource) -> PresentationContext {
    detect(&source.sample())
}

/// Fallback heuristic for mobile hosts without an authoritative signal.
///
/// Requires a mobile user agent, no referrer, a viewport filling the screen
/// and no platform installed flag at all.
pub fn looks_installed(signals: &EnvironmentSignals) -> bool {
    let mobile = signals.user_agent.as_deref().is_some_and(is_mobile_user_agent);
    let no_referrer = signals.referrer.as_deref().map_or(true, |r| r.trim().is_empty());
    let fills_screen = match (signals.viewport, signals.screen) {
        (Some(viewport), Some(screen)) => viewport == screen,
        _ => false,
    };

    mobile && no_referrer && fills_screen && signals.installed_flag.is_none()
}

/// Case-insensitive match against [`MOBILE_UA_MARKERS`].
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let lower = user_agent.to_ascii_lowercase();
    MOBILE_UA_MARKERS.iter().any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Dimensions, DisplayModeMatches};

    const ANDROID_UA: &str =
        "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Mobile Safari/537.36";
    const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/128.0";

    fn media(standalone: bool, fullscreen: bool, browser: bool) -> Option<DisplayModeMatches> {
        Some(DisplayModeMatches {
            standalone,
            fullscreen,
            browser,
        })
    }

    fn android_fullbleed() -> EnvironmentSignals {
        EnvironmentSignals {
            user_agent: Some(ANDROID_UA.to_string()),
            viewport: Some(Dimensions::new(412, 915)),
            screen: Some(Dimensions::new(412, 915)),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_apis_default_to_browser() {
        assert_eq!(detect(&EnvironmentSignals::default()), PresentationContext::Browser);
    }

    #[test]
    fn test_fullscreen_element_beats_stale_media_query() {
        let signals = EnvironmentSignals {
            fullscreen_element: true,
            display_mode: media(true, false, false),
            installed_flag: Some(true),
            ..Default::default()
        };
        assert_eq!(detect(&signals), PresentationContext::Fullscreen);
    }

    #[test]
    fn test_standalone_media_query() {
        let signals = EnvironmentSignals {
            display_mode: media(true, false, false),
            ..Default::default()
        };
        assert_eq!(detect(&signals), PresentationContext::Standalone);
    }

    #[test]
    fn test_installed_flag() {
        let signals = EnvironmentSignals {
            display_mode: media(false, false, true),
            installed_flag: Some(true),
            ..Default::default()
        };
        assert_eq!(detect(&signals), PresentationContext::Standalone);
    }

    #[test]
    fn test_standalone_outranks_fullscreen_media_query() {
        let signals = EnvironmentSignals {
            display_mode: media(true, true, false),
            ..Default::default()
        };
        assert_eq!(detect(&signals), PresentationContext::Standalone);
    }

    #[test]
    fn test_fullscreen_media_query() {
        let signals = EnvironmentSignals {
            display_mode: media(false, true, false),
            ..Default::default()
        };
        assert_eq!(detect(&signals), PresentationContext::Fullscreen);
    }

    #[test]
    fn test_browser_media_query() {
        let signals = EnvironmentSignals {
            display_mode: media(false, false, true),
            user_agent: Some(DESKTOP_UA.to_string()),
            ..Default::default()
        };
        assert_eq!(detect(&signals), PresentationContext::Browser);
    }

    #[test]
    fn test_mobile_heuristic() {
        assert_eq!(detect(&android_fullbleed()), PresentationContext::Standalone);
    }

    #[test]
    fn test_mobile_heuristic_needs_every_condition() {
        let mut with_referrer = android_fullbleed();
        with_referrer.referrer = Some("https://search.example/".to_string());
        assert!(!looks_installed(&with_referrer));

        let mut empty_referrer = android_fullbleed();
        empty_referrer.referrer = Some(String::new());
        assert!(looks_installed(&empty_referrer));

        let mut windowed = android_fullbleed();
        windowed.viewport = Some(Dimensions::new(412, 800));
        assert!(!looks_installed(&windowed));

        let mut with_flag = android_fullbleed();
        with_flag.installed_flag = Some(false);
        assert!(!looks_installed(&with_flag));
        assert_eq!(detect(&with_flag), PresentationContext::Browser);

        let mut desktop = android_fullbleed();
        desktop.user_agent = Some(DESKTOP_UA.to_string());
        assert!(!looks_installed(&desktop));
    }

    #[test]
    fn test_mobile_user_agent() {
        assert!(is_mobile_user_agent(ANDROID_UA));
        assert!(is_mobile_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)"));
        assert!(!is_mobile_user_agent(DESKTOP_UA));
    }
}
