//! Match resolver.
//!
//! Maps raw user text onto a catalog topic with a fixed priority order,
//! first match wins:
//!
//! 1. exact key (`"1"`, `"AJUDA"`)
//! 2. a catalog title contained in the text
//! 3. the word `menu` anywhere
//! 4. keyword groups, in declaration order
//! 5. otherwise unmatched
//!
//! Every comparison is plain substring containment on lower-cased text. Short
//! keywords match inside longer words, so `"parques"` lands on air through
//! `"ar"` before the conservation group is consulted.

use tracing::debug;

use crate::catalog;
use crate::types::{Resolution, TopicKey};

/// Keyword groups in evaluation order.
pub static KEYWORD_GROUPS: &[(TopicKey, &[&str])] = &[
    (TopicKey::Air, &["qualidade do ar", "poluição", "ar"]),
    (TopicKey::Water, &["água", "rios", "lagos"]),
    (TopicKey::Temperature, &["temperatura", "clima", "aquecimento"]),
    (TopicKey::FaunaFlora, &["fauna", "flora", "animais", "plantas"]),
    (TopicKey::Conservation, &["conservação", "parques", "reservas"]),
    (TopicKey::Links, &["links", "sites", "recursos"]),
    (TopicKey::Help, &["ajuda", "como usar", "funciona"]),
];

const MENU_WORD: &str = "menu";

/// Resolve `text` against the catalog. Pure and total.
pub fn resolve(text: &str) -> Resolution {
    let trimmed = text.trim();

    // Exact key
    if let Some(option) = catalog::lookup_by_key(trimmed) {
        debug!(key = option.key, "Resolved by exact key");
        return Resolution::Topic(option.topic);
    }

    let lower = trimmed.to_lowercase();

    // Title substring
    for option in catalog::all_options() {
        if lower.contains(&option.title.to_lowercase()) {
            debug!(key = option.key, "Resolved by title");
            return Resolution::Topic(option.topic);
        }
    }

    // Menu
    if lower.contains(MENU_WORD) {
        debug!("Resolved to menu");
        return Resolution::ShowMenu;
    }

    // Keyword groups
    for (topic, keywords) in KEYWORD_GROUPS {
        if let Some(keyword) = keywords.iter().find(|k| lower.contains(*k)) {
            debug!(key = topic.key(), keyword = *keyword, "Resolved by keyword");
            return Resolution::Topic(*topic);
        }
    }

    debug!("No rule matched");
    Resolution::Unmatched(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(text: &str) -> Option<TopicKey> {
        match resolve(text) {
            Resolution::Topic(t) => Some(t),
            _ => None,
        }
    }

    // ---- exact key ----

    #[test]
    fn test_exact_keys() {
        assert_eq!(topic("1"), Some(TopicKey::Air));
        assert_eq!(topic("2"), Some(TopicKey::Water));
        assert_eq!(topic("3"), Some(TopicKey::Temperature));
        assert_eq!(topic("4"), Some(TopicKey::FaunaFlora));
        assert_eq!(topic("5"), Some(TopicKey::Conservation));
        assert_eq!(topic("6"), Some(TopicKey::Links));
        assert_eq!(topic("ajuda"), Some(TopicKey::Help));
    }

    #[test]
    fn test_exact_key_any_case() {
        assert_eq!(topic("AJUDA"), Some(TopicKey::Help));
        assert_eq!(topic("Ajuda"), Some(TopicKey::Help));
    }

    #[test]
    fn test_exact_key_ignores_surrounding_whitespace() {
        assert_eq!(topic("  6 \n"), Some(TopicKey::Links));
    }

    #[test]
    fn test_number_not_a_key_falls_through() {
        assert_eq!(resolve("7"), Resolution::Unmatched("7".to_string()));
        assert_eq!(resolve("16"), Resolution::Unmatched("16".to_string()));
    }

    // ---- title ----

    #[test]
    fn test_title_in_sentence() {
        assert_eq!(
            topic("quero ver a qualidade da água hoje"),
            Some(TopicKey::Water)
        );
        assert_eq!(
            topic("me fale de Temperatura e Mudanças Climáticas"),
            Some(TopicKey::Temperature)
        );
        assert_eq!(topic("tem recursos e links?"), Some(TopicKey::Links));
    }

    #[test]
    fn test_title_beats_menu() {
        assert_eq!(topic("menu fauna e flora"), Some(TopicKey::FaunaFlora));
    }

    #[test]
    fn test_first_title_in_declaration_order_wins() {
        assert_eq!(
            topic("fauna e flora e qualidade do ar"),
            Some(TopicKey::Air)
        );
    }

    #[test]
    fn test_help_title_matches_inside_sentence() {
        assert_eq!(topic("preciso de ajuda com o ar"), Some(TopicKey::Help));
    }

    // ---- menu ----

    #[test]
    fn test_menu_substring() {
        assert_eq!(resolve("menu"), Resolution::ShowMenu);
        assert_eq!(resolve("voltar ao MENU"), Resolution::ShowMenu);
    }

    // ---- keyword groups ----

    #[test]
    fn test_keyword_groups() {
        assert_eq!(topic("poluição"), Some(TopicKey::Air));
        assert_eq!(topic("rios"), Some(TopicKey::Water));
        assert_eq!(topic("clima"), Some(TopicKey::Temperature));
        assert_eq!(topic("animais"), Some(TopicKey::FaunaFlora));
        assert_eq!(topic("conservação"), Some(TopicKey::Conservation));
        assert_eq!(topic("sites"), Some(TopicKey::Links));
        assert_eq!(topic("funciona"), Some(TopicKey::Help));
    }

    #[test]
    fn test_short_air_keyword_shadows_later_groups() {
        assert_eq!(topic("parques"), Some(TopicKey::Air));
        assert_eq!(topic("como usar"), Some(TopicKey::Air));
        assert_eq!(topic("água e ar"), Some(TopicKey::Air));
    }

    #[test]
    fn test_group_order_water_before_links() {
        assert_eq!(topic("sites sobre lagos"), Some(TopicKey::Water));
    }

    #[test]
    fn test_keyword_case_insensitive() {
        assert_eq!(topic("FLORA"), Some(TopicKey::FaunaFlora));
        assert_eq!(topic("ÁGUA"), Some(TopicKey::Water));
    }

    // ---- fallback ----

    #[test]
    fn test_unmatched_keeps_text() {
        assert_eq!(
            resolve("bla bla bla"),
            Resolution::Unmatched("bla bla bla".to_string())
        );
    }

    #[test]
    fn test_resolve_is_idempotent() {
        for text in ["1", "parques", "menu", "xyz", "Fauna e Flora"] {
            assert_eq!(resolve(text), resolve(text));
        }
    }
}
