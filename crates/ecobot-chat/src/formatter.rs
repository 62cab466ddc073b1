//! Response formatting.
//!
//! Renders catalog content into the markup-light Portuguese text shown in the
//! transcript. Bold uses `**`, blocks are separated by blank lines.

use std::fmt::Write;

use crate::catalog::{self, TopicContent};
use crate::types::{Resolution, TopicKey};

/// Closing line appended to every data topic.
pub const NAVIGATION_HINT: &str =
    "Digite um número para ver outras informações ou \"menu\" para voltar ao menu principal.";

/// Marker the transcript uses to flag replies with external links.
pub const LINK_MARKER: &str = "url:";

const HELP_TEXT: &str = "❓ **COMO USAR O ECOBOT** ❓\n\n\
Digite o número da opção desejada ou escreva sua pergunta.\n\n\
Exemplos:\n\
- Digite \"1\" para dados sobre qualidade do ar\n\
- Digite \"fauna\" para informações sobre biodiversidade\n\
- Digite \"menu\" para ver todas as opções\n\n\
Também respondo perguntas diretas sobre temas ambientais. Experimente!";

/// Reply for unmatched input. The web widget's copy carried template
/// indentation after the first sentence; this text has none.
const FALLBACK_TEXT: &str = "Não tenho informações específicas sobre isso, mas posso ajudar com dados ambientais.\n\n\
Digite um número para acessar os dados:\n\
1 - Qualidade do Ar\n\
2 - Qualidade da Água\n\
3 - Temperatura e Clima\n\
4 - Fauna e Flora\n\
5 - Áreas de Conservação\n\
6 - Recursos e Links\n\n\
Ou digite \"ajuda\" para instruções.";

const BIODIVERSITY_CLOSING: &str = "O Brasil abriga cerca de 20% de toda a biodiversidade do planeta, com mais de 116.000 espécies de animais e 46.000 espécies de plantas catalogadas.";

const LINKS_CLOSING: &str =
    "Esses sites oferecem dados oficiais e confiáveis sobre temas ambientais no Brasil.";

/// Whether rendered text carries external links.
pub fn contains_links(text: &str) -> bool {
    text.to_lowercase().contains(LINK_MARKER)
}

/// Greeting plus one line per catalog entry.
pub fn welcome_text() -> String {
    let mut out = String::from(
        "👋 **Olá! Eu sou o EcoBot, seu assistente virtual para dados ambientais.**\n\n\
         Posso fornecer informações atualizadas sobre diversos temas ambientais. \
         Escolha uma das opções abaixo digitando o número correspondente:\n\n",
    );
    for option in catalog::all_options() {
        let _ = write!(
            out,
            "**{}** - {}: {}\n\n",
            option.key, option.title, option.description
        );
    }
    out.push_str(
        "Ou simplesmente escreva sua pergunta sobre dados ambientais que tentarei responder da melhor forma possível.",
    );
    out
}

/// Fixed reply for text no rule matched.
pub fn fallback_text() -> &'static str {
    FALLBACK_TEXT
}

/// Fallback variant that quotes the user's text back.
pub fn echo_fallback_text(text: &str) -> String {
    format!(
        "Não encontrei informações específicas sobre \"{}\". Tente uma das opções do menu principal ou uma pergunta mais específica sobre meio ambiente.",
        text
    )
}

/// Render a resolution. `echo_unmatched` picks the quoting fallback.
pub fn render(resolution: &Resolution, echo_unmatched: bool) -> String {
    match resolution {
        Resolution::Topic(topic) => render_topic(*topic),
        Resolution::ShowMenu => welcome_text(),
        Resolution::Unmatched(text) if echo_unmatched => echo_fallback_text(text),
        Resolution::Unmatched(_) => FALLBACK_TEXT.to_string(),
    }
}

/// Render the content block for one topic.
pub fn render_topic(topic: TopicKey) -> String {
    match catalog::content_for(topic) {
        TopicContent::AirQuality(report) => {
            let mut out = format!(
                "📊 **QUALIDADE DO AR** 📊\n\nDados atualizados em {}:\n\n",
                report.last_updated
            );
            for r in report.regions {
                let _ = write!(
                    out,
                    "🏙️ **{}**\nQualidade: {}\nPM2.5: {} µg/m³\nPM10: {} µg/m³\nNO₂: {} µg/m³\nO₃: {} µg/m³\n\n{}\n\n",
                    r.name, r.quality, r.pm25, r.pm10, r.no2, r.o3, r.description
                );
            }
            finish_with_source(out, report.source)
        }
        TopicContent::WaterQuality(report) => {
            let mut out = format!(
                "💧 **QUALIDADE DA ÁGUA** 💧\n\nDados atualizados em {}:\n\n",
                report.last_updated
            );
            for b in report.bodies {
                let _ = write!(
                    out,
                    "🌊 **{}**\nQualidade: {}\npH: {}\nOxigênio Dissolvido: {}\nTemperatura: {}°C\n\n{}\n\n",
                    b.name, b.quality, b.ph, b.oxygen, b.temperature, b.description
                );
            }
            finish_with_source(out, report.source)
        }
        TopicContent::Temperature(report) => {
            let mut out = format!(
                "🌡️ **TEMPERATURA E MUDANÇAS CLIMÁTICAS** 🌡️\n\nDados atualizados em {}:\n\n",
                report.last_updated
            );
            for t in report.trends {
                let _ = write!(
                    out,
                    "🌍 **{}**\nTemperatura média: {}\nAumento: {}\n\n{}\n\n",
                    t.region, t.average, t.increase, t.description
                );
            }
            let _ = write!(out, "📈 **Projeção futura**\n{}\n\n", report.projection);
            finish_with_source(out, report.source)
        }
        TopicContent::Biodiversity(facts) => {
            let mut out = String::from(
                "🦜 **FAUNA E FLORA BRASILEIRAS** 🌿\n\nCuriosidades sobre nossa biodiversidade:\n\n",
            );
            for f in facts {
                let icon = match f.category {
                    catalog::FactCategory::Fauna => "🦁",
                    catalog::FactCategory::Flora => "🌴",
                };
                let _ = write!(
                    out,
                    "{} **{}** ({}):\n{}\n\n",
                    icon,
                    f.title,
                    f.category.label(),
                    f.fact
                );
            }
            finish(out, BIODIVERSITY_CLOSING)
        }
        TopicContent::Conservation(report) => {
            let mut out = format!(
                "🌳 **ÁREAS DE CONSERVAÇÃO** 🌳\n\nDados atualizados em {}:\n\n",
                report.last_updated
            );
            for a in report.areas {
                let _ = write!(
                    out,
                    "🏞️ **{}**\nÁrea total: {}\nPercentual do território: {}\n\n{}\n\n",
                    a.name, a.area, a.percentage, a.description
                );
            }
            let _ = write!(out, "**Desafios atuais**\n{}\n\n", report.challenges);
            finish_with_source(out, report.source)
        }
        TopicContent::Links(links) => {
            let mut out = String::from(
                "🔗 **RECURSOS E LINKS ÚTEIS** 🔗\n\nFontes confiáveis de informações ambientais:\n\n",
            );
            for l in links {
                let _ = write!(out, "📌 **{}**\n{}\nURL: {}\n\n", l.title, l.description, l.url);
            }
            finish(out, LINKS_CLOSING)
        }
        TopicContent::Help => HELP_TEXT.to_string(),
    }
}

fn finish_with_source(out: String, source: &str) -> String {
    finish(out, &format!("Fonte: {}", source))
}

fn finish(mut out: String, closing: &str) -> String {
    out.push_str(closing);
    out.push_str("\n\n");
    out.push_str(NAVIGATION_HINT);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- topics ----

    #[test]
    fn test_air_block_layout() {
        let text = render_topic(TopicKey::Air);
        assert!(text.starts_with("📊 **QUALIDADE DO AR** 📊\n\nDados atualizados em 13/05/2025:\n\n"));
        assert!(text.contains(
            "🏙️ **São Paulo - Centro**\nQualidade: Moderada\nPM2.5: 18.2 µg/m³\nPM10: 39.5 µg/m³\nNO₂: 45.2 µg/m³\nO₃: 62.3 µg/m³\n\n"
        ));
        assert!(text.contains("Fonte: Monitores ambientais das principais capitais brasileiras\n\n"));
        assert!(text.ends_with(NAVIGATION_HINT));
    }

    #[test]
    fn test_water_block_layout() {
        let text = render_topic(TopicKey::Water);
        assert!(text.starts_with("💧 **QUALIDADE DA ÁGUA** 💧"));
        assert!(text.contains(
            "🌊 **Lago Paranoá - Brasília**\nQualidade: Boa\npH: 7.8\nOxigênio Dissolvido: 6.9 mg/L\nTemperatura: 22.5°C\n\n"
        ));
        assert_eq!(text.matches("🌊").count(), 5);
    }

    #[test]
    fn test_temperature_has_projection() {
        let text = render_topic(TopicKey::Temperature);
        assert!(text.contains("🌍 **Sul**\nTemperatura média: 18.3°C\nAumento: +0.8°C nos últimos 50 anos\n\n"));
        assert!(text.contains("📈 **Projeção futura**\nModelos climáticos"));
        let projection = text.find("Projeção futura").unwrap();
        let source = text.find("Fonte:").unwrap();
        assert!(projection < source);
    }

    #[test]
    fn test_biodiversity_icons_and_closing() {
        let text = render_topic(TopicKey::FaunaFlora);
        assert!(text.contains("🦁 **Amazônia** (Fauna):\n"));
        assert!(text.contains("🌴 **Pantanal** (Flora):\n"));
        assert!(text.contains("116.000 espécies de animais"));
        assert!(!text.contains("Fonte:"));
        assert!(text.ends_with(NAVIGATION_HINT));
    }

    #[test]
    fn test_conservation_has_challenges() {
        let text = render_topic(TopicKey::Conservation);
        assert!(text.contains("🏞️ **Terras Indígenas**\nÁrea total: 117 milhões de hectares\nPercentual do território: 13.8% do território nacional\n\n"));
        assert!(text.contains("**Desafios atuais**\nPressões de desmatamento"));
    }

    #[test]
    fn test_links_every_line_prefixed() {
        let text = render_topic(TopicKey::Links);
        assert_eq!(text.matches("URL: https://").count(), 5);
        assert!(text.contains("URL: https://queimadas.dgi.inpe.br/queimadas/sisam/\n\n"));
        assert!(contains_links(&text));
    }

    #[test]
    fn test_only_links_topic_has_links() {
        for topic in TopicKey::ALL {
            assert_eq!(
                contains_links(&render_topic(topic)),
                topic == TopicKey::Links,
                "{:?}",
                topic
            );
        }
    }

    #[test]
    fn test_help_text() {
        let text = render_topic(TopicKey::Help);
        assert!(text.starts_with("❓ **COMO USAR O ECOBOT** ❓"));
        assert!(text.ends_with("Experimente!"));
    }

    // ---- menu and fallback ----

    #[test]
    fn test_welcome_lists_every_option() {
        let text = welcome_text();
        assert!(text.starts_with("👋 **Olá! Eu sou o EcoBot"));
        assert!(text.contains("**1** - Qualidade do Ar: Dados sobre qualidade do ar em diferentes regiões do Brasil\n\n"));
        assert!(text.contains("**ajuda** - Ajuda: Instruções sobre como usar o chatbot\n\n"));
        assert!(text.ends_with("da melhor forma possível."));
        assert_eq!(render(&Resolution::ShowMenu, false), text);
    }

    #[test]
    fn test_fallback_does_not_echo_by_default() {
        let text = render(&Resolution::Unmatched("xyzzy".to_string()), false);
        assert_eq!(text, fallback_text());
        assert!(!text.contains("xyzzy"));
        assert!(!contains_links(&text));
        assert!(text.contains("dados ambientais.\n\nDigite um número"));
        assert!(!text.contains("\n "));
    }

    #[test]
    fn test_echo_fallback_quotes_input() {
        let text = render(&Resolution::Unmatched("xyzzy".to_string()), true);
        assert!(text.starts_with("Não encontrei informações específicas sobre \"xyzzy\"."));
    }

    #[test]
    fn test_contains_links_case_insensitive() {
        assert!(contains_links("veja Url: x"));
        assert!(contains_links("URL:"));
        assert!(!contains_links("urls"));
    }
}
