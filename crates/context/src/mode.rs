//! UX selection and resolution logic.
//!
//! Pure domain logic - no I/O, no platform dependencies.

use crate::state::{PresentationContext, SessionNature};
use serde::{Deserialize, Serialize};

/// Which of the two alternative interface sections is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UxSelection {
    /// Regular website UI.
    #[default]
    Web,

    /// Installed-app UI.
    App,
}

impl UxSelection {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            UxSelection::Web => "web",
            UxSelection::App => "app",
        }
    }

    /// The selection shown when this one cannot be.
    pub fn other(&self) -> UxSelection {
        match self {
            UxSelection::Web => UxSelection::App,
            UxSelection::App => UxSelection::Web,
        }
    }

    /// Lenient parse used for deep-link intents. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<UxSelection> {
        match value.trim().to_ascii_lowercase().as_str() {
            "web" => Some(UxSelection::Web),
            "app" => Some(UxSelection::App),
            _ => None,
        }
    }
}

impl std::fmt::Display for UxSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Operator-configurable defaults for the two non-derived contexts.
///
/// Fullscreen has no entry here: it follows the session nature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub standalone_to: UxSelection,
    pub browser_to: UxSelection,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            standalone_to: UxSelection::App,
            browser_to: UxSelection::Web,
        }
    }
}

/// Resolve the UX selection for an observed context.
///
/// Priority:
/// 1. Manual override (always wins)
/// 2. Standalone -> `mapping.standalone_to`
/// 3. Fullscreen -> App for standalone sessions, Web otherwise (mapping ignored)
/// 4. Browser -> `mapping.browser_to`
pub fn resolve(
    context: PresentationContext,
    nature: SessionNature,
    override_selection: Option<UxSelection>,
    mapping: &MappingConfig,
) -> UxSelection {
    if let Some(selection) = override_selection {
        return selection;
    }

    match context {
        PresentationContext::Standalone => mapping.standalone_to,
        // Entering OS fullscreen is not a session-type change.
        PresentationContext::Fullscreen => {
            if nature.is_standalone() {
                UxSelection::App
            } else {
                UxSelection::Web
            }
        }
        PresentationContext::Browser => mapping.browser_to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXTS: [PresentationContext; 3] = [
        PresentationContext::Browser,
        PresentationContext::Standalone,
        PresentationContext::Fullscreen,
    ];
    const NATURES: [SessionNature; 2] = [SessionNature::Browser, SessionNature::Standalone];
    const SELECTIONS: [UxSelection; 2] = [UxSelection::Web, UxSelection::App];

    fn all_mappings() -> Vec<MappingConfig> {
        let mut out = Vec::new();
        for standalone_to in SELECTIONS {
            for browser_to in SELECTIONS {
                out.push(MappingConfig {
                    standalone_to,
                    browser_to,
                });
            }
        }
        out
    }

    #[test]
    fn test_override_dominates() {
        for mapping in all_mappings() {
            for context in CONTEXTS {
                for nature in NATURES {
                    for pinned in SELECTIONS {
                        assert_eq!(resolve(context, nature, Some(pinned), &mapping), pinned);
                    }
                }
            }
        }
    }

    #[test]
    fn test_fullscreen_ignores_mapping() {
        for nature in NATURES {
            let results: Vec<_> = all_mappings()
                .iter()
                .map(|m| resolve(PresentationContext::Fullscreen, nature, None, m))
                .collect();
            assert!(results.windows(2).all(|w| w[0] == w[1]));
        }

        let inverted = MappingConfig {
            standalone_to: UxSelection::Web,
            browser_to: UxSelection::App,
        };
        assert_eq!(
            resolve(PresentationContext::Fullscreen, SessionNature::Standalone, None, &inverted),
            UxSelection::App
        );
        assert_eq!(
            resolve(PresentationContext::Fullscreen, SessionNature::Browser, None, &inverted),
            UxSelection::Web
        );
    }

    #[test]
    fn test_mapped_contexts_follow_mapping() {
        for mapping in all_mappings() {
            for nature in NATURES {
                assert_eq!(
                    resolve(PresentationContext::Standalone, nature, None, &mapping),
                    mapping.standalone_to
                );
                assert_eq!(
                    resolve(PresentationContext::Browser, nature, None, &mapping),
                    mapping.browser_to
                );
            }
        }
    }

    #[test]
    fn test_parse_is_lenient() {
        assert_eq!(UxSelection::parse(" APP "), Some(UxSelection::App));
        assert_eq!(UxSelection::parse("web"), Some(UxSelection::Web));
        assert_eq!(UxSelection::parse("desktop"), None);
        assert_eq!(UxSelection::parse(""), None);
    }

    #[test]
    fn test_mapping_partial_deserialize_keeps_defaults() {
        let mapping: MappingConfig = serde_json::from_str(r#"{"browser_to": "app"}"#).unwrap();
        assert_eq!(mapping.browser_to, UxSelection::App);
        assert_eq!(mapping.standalone_to, UxSelection::App);
    }
}
