//! Static text tables served by the heartbeat and guidance routes.

use lumen_geometry::{Element, Solid};

/// Distress cue → seed broadcast by the auto-resonance session it triggers.
pub const HEARTBEAT_CUES: [(&str, &str); 4] = [
    ("i feel lost", "Stabilization – 443 792 854 61523"),
    ("i'm afraid", "Safety Field – 55 16 987"),
    ("ungrounded", "Chakra Rooting – 10 010 5856"),
    ("dizzy", "Root Down – 51 86 923"),
];

/// Cues contained in `text`, compared case-insensitively, in table order.
pub fn matched_cues(text: &str) -> Vec<(&'static str, &'static str)> {
    let text = text.to_lowercase();
    HEARTBEAT_CUES
        .iter()
        .copied()
        .filter(|(cue, _)| text.contains(cue))
        .collect()
}

const INVOCATIONS: [(&str, &str); 5] = [
    (
        "heart",
        "Place your hand on your heart and say: 'I am safe. I am whole. I am here.'",
    ),
    (
        "breathe",
        "Inhale deeply through the nose... hold... and exhale slowly. Repeat 3 times.",
    ),
    (
        "presence",
        "Look around you. Name 3 things you can see, 2 you can touch, 1 you can hear.",
    ),
    (
        "ground",
        "Imagine roots extending from your feet into the Earth. Feel held. Supported.",
    ),
    (
        "general",
        "You are invited to pause and feel your breath. You are not alone.",
    ),
];

/// Invocation text for a guidance type; unknown types get the general one.
pub fn invocation(kind: &str) -> &'static str {
    let kind = kind.trim().to_lowercase();
    INVOCATIONS
        .iter()
        .find(|(name, _)| *name == kind)
        .or_else(|| INVOCATIONS.iter().find(|(name, _)| *name == "general"))
        .map_or("", |(_, text)| *text)
}

pub fn element_guidance(element: Element) -> &'static str {
    match element {
        Element::Fire => "Focus on your inner fire and passion.",
        Element::Earth => "Connect to stability and groundedness.",
        Element::Air => "Allow mental clarity and fresh perspective.",
        Element::Water => "Flow with your emotions and intuition.",
        Element::Ether => "Open to higher consciousness and spiritual connection.",
    }
}

/// Element a piece of text resonates with.
pub fn element_for(text: &str) -> Element {
    Solid::for_seed(text).properties().element
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_match_case_insensitively() {
        let matched = matched_cues("Honestly I feel LOST and a bit dizzy");
        let cues: Vec<&str> = matched.iter().map(|(c, _)| *c).collect();
        assert_eq!(cues, vec!["i feel lost", "dizzy"]);
    }

    #[test]
    fn no_cues_in_neutral_text() {
        assert!(matched_cues("a lovely sunny day").is_empty());
    }

    #[test]
    fn unknown_invocation_falls_back_to_general() {
        assert_eq!(invocation("whatever"), invocation("general"));
        assert!(invocation("Heart").starts_with("Place your hand"));
    }

    #[test]
    fn every_element_has_guidance() {
        for solid in Solid::ALL {
            assert!(!element_guidance(solid.properties().element).is_empty());
        }
    }
}
