//! Targets of the fetch-completion broadcast.

use std::rc::Rc;

use contracts::shared::Payload;
use contracts::wire::FETCHED_EVENT;

/// Configured subscriber: a selector resolved to its first match, or a ready handle.
pub enum SubscriberSpec<E> {
    Selector(String),
    Element(E),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedEvent {
    pub name: &'static str,
    pub data: Payload,
}

impl FetchedEvent {
    pub fn new(data: Payload) -> Self {
        Self {
            name: FETCHED_EVENT,
            data,
        }
    }
}

pub trait Subscriber {
    fn deliver(&self, event: &FetchedEvent);
}

/// Looks a selector up in the page.
pub type SubscriberLookup = Box<dyn Fn(&str) -> Option<Rc<dyn Subscriber>>>;

/// Resolves every spec, silently skipping selectors with no match.
pub fn resolve<E>(
    specs: Vec<SubscriberSpec<E>>,
    lookup: impl Fn(&str) -> Option<E>,
) -> Vec<E> {
    specs
        .into_iter()
        .filter_map(|spec| match spec {
            SubscriberSpec::Element(element) => Some(element),
            SubscriberSpec::Selector(selector) => {
                let found = lookup(&selector);
                if found.is_none() {
                    log::debug!("livefilter: subscriber '{}' matched nothing", selector);
                }
                found
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_skips_unmatched_selectors() {
        let specs = vec![
            SubscriberSpec::Selector("#results".to_string()),
            SubscriberSpec::Selector("#missing".to_string()),
            SubscriberSpec::Element("sidebar"),
        ];

        let resolved = resolve(specs, |selector| match selector {
            "#results" => Some("results"),
            _ => None,
        });

        assert_eq!(resolved, vec!["results", "sidebar"]);
    }

    #[test]
    fn test_event_carries_name() {
        let event = FetchedEvent::new(Payload::Text("<li>ok</li>".into()));
        assert_eq!(event.name, "livefilterfetched");
    }
}
