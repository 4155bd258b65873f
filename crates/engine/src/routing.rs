//! Deep-link intent parsing and navigation URL synthesis.
//!
//! Intent parsing is lenient: anything missing or malformed yields no intent.

use crate::config::{Routes, RoutingConfig, RoutingStrategy};
use url::Url;
use uxmode_context::UxSelection;

/// Read a selection encoded in `location` under the active strategy.
pub fn read_intent(location: &str, routing: &RoutingConfig) -> Option<UxSelection> {
    match routing.strategy {
        RoutingStrategy::Runtime => None,
        RoutingStrategy::Query => {
            let url = Url::parse(location).ok()?;
            let value = url
                .query_pairs()
                .find(|(key, _)| key == routing.query_param.as_str())
                .map(|(_, value)| value.into_owned())?;
            UxSelection::parse(&value)
        }
        RoutingStrategy::Hash => {
            let url = Url::parse(location).ok()?;
            let value = url.fragment()?.strip_prefix(routing.hash_prefix.as_str())?;
            UxSelection::parse(value)
        }
    }
}

/// Build the URL that shows `target`, starting from `current`.
///
/// A configured route replaces the path. The query strategy sets its
/// parameter in place (other pairs are kept), the hash strategy replaces the
/// fragment. Returns `None` when nothing would encode the target or `current`
/// does not parse.
pub fn target_url(
    current: &str,
    target: UxSelection,
    routing: &RoutingConfig,
    routes: &Routes,
) -> Option<String> {
    let route = routes.for_selection(target);
    if routing.strategy == RoutingStrategy::Runtime && route.is_none() {
        return None;
    }

    let mut url = Url::parse(current).ok()?;
    if let Some(path) = route {
        url = url.join(path).ok()?;
    }

    if read_intent(url.as_str(), routing) == Some(target) {
        return Some(url.into());
    }

    match routing.strategy {
        RoutingStrategy::Runtime => {}
        RoutingStrategy::Query => set_query_param(&mut url, &routing.query_param, target.as_str()),
        RoutingStrategy::Hash => {
            url.set_fragment(Some(&format!("{}{}", routing.hash_prefix, target)));
        }
    }

    Some(url.into())
}

/// Whether two locations point at the same place.
pub fn same_location(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn set_query_param(url: &mut Url, param: &str, value: &str) {
    let mut replaced = false;
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, existing) in url.query_pairs() {
        if key == param {
            if !replaced {
                pairs.push((param.to_string(), value.to_string()));
                replaced = true;
            }
        } else {
            pairs.push((key.into_owned(), existing.into_owned()));
        }
    }
    if !replaced {
        pairs.push((param.to_string(), value.to_string()));
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
}
