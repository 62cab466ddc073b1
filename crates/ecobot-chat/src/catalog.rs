//! Static topic catalog and per-topic content.
//!
//! Everything here is defined at compile time and never changes while the
//! process runs. The menu order is the declaration order of [`TOPIC_OPTIONS`].

use crate::types::{MenuEntry, TopicKey};

/// Number of entries shown as quick-access buttons.
pub const QUICK_ACCESS_LEN: usize = 6;

// =============================================================================
// Menu options
// =============================================================================

/// One menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicOption {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub topic: TopicKey,
}

pub static TOPIC_OPTIONS: [TopicOption; 7] = [
    TopicOption {
        key: "1",
        title: "Qualidade do Ar",
        description: "Dados sobre qualidade do ar em diferentes regiões do Brasil",
        topic: TopicKey::Air,
    },
    TopicOption {
        key: "2",
        title: "Qualidade da Água",
        description: "Informações sobre rios, lagos e qualidade da água",
        topic: TopicKey::Water,
    },
    TopicOption {
        key: "3",
        title: "Temperatura e Mudanças Climáticas",
        description: "Dados sobre temperatura e tendências climáticas",
        topic: TopicKey::Temperature,
    },
    TopicOption {
        key: "4",
        title: "Fauna e Flora",
        description: "Fatos interessantes sobre fauna e flora brasileiras",
        topic: TopicKey::FaunaFlora,
    },
    TopicOption {
        key: "5",
        title: "Áreas de Conservação",
        description: "Dados sobre unidades de conservação e proteção ambiental",
        topic: TopicKey::Conservation,
    },
    TopicOption {
        key: "6",
        title: "Recursos e Links",
        description: "Links para fontes confiáveis de informações ambientais",
        topic: TopicKey::Links,
    },
    TopicOption {
        key: "ajuda",
        title: "Ajuda",
        description: "Instruções sobre como usar o chatbot",
        topic: TopicKey::Help,
    },
];

/// Find an option by key, ignoring case.
pub fn lookup_by_key(key: &str) -> Option<&'static TopicOption> {
    let wanted = key.to_lowercase();
    TOPIC_OPTIONS.iter().find(|o| o.key.to_lowercase() == wanted)
}

/// Every option in menu order.
pub fn all_options() -> &'static [TopicOption] {
    &TOPIC_OPTIONS
}

/// The quick-access subset (everything but help).
pub fn quick_access() -> &'static [TopicOption] {
    &TOPIC_OPTIONS[..QUICK_ACCESS_LEN]
}

/// Quick-access options as owned menu entries.
pub fn menu_entries() -> Vec<MenuEntry> {
    quick_access()
        .iter()
        .map(|o| MenuEntry {
            key: o.key.to_string(),
            title: o.title.to_string(),
        })
        .collect()
}

// =============================================================================
// Content records
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirRegion {
    pub name: &'static str,
    pub quality: &'static str,
    pub pm25: f64,
    pub pm10: f64,
    pub no2: f64,
    pub o3: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirQualityReport {
    pub regions: &'static [AirRegion],
    pub last_updated: &'static str,
    pub source: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterBody {
    pub name: &'static str,
    pub quality: &'static str,
    pub ph: f64,
    pub oxygen: &'static str,
    pub temperature: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterQualityReport {
    pub bodies: &'static [WaterBody],
    pub last_updated: &'static str,
    pub source: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureTrend {
    pub region: &'static str,
    pub average: &'static str,
    pub increase: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureReport {
    pub trends: &'static [TemperatureTrend],
    pub projection: &'static str,
    pub last_updated: &'static str,
    pub source: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactCategory {
    Fauna,
    Flora,
}

impl FactCategory {
    pub fn label(&self) -> &'static str {
        match self {
            FactCategory::Fauna => "Fauna",
            FactCategory::Flora => "Flora",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiodiversityFact {
    pub category: FactCategory,
    pub title: &'static str,
    pub fact: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConservationArea {
    pub name: &'static str,
    pub area: &'static str,
    pub percentage: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConservationReport {
    pub areas: &'static [ConservationArea],
    pub challenges: &'static str,
    pub last_updated: &'static str,
    pub source: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentalLink {
    pub title: &'static str,
    pub url: &'static str,
    pub description: &'static str,
}

/// Content behind a topic key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TopicContent {
    AirQuality(&'static AirQualityReport),
    WaterQuality(&'static WaterQualityReport),
    Temperature(&'static TemperatureReport),
    Biodiversity(&'static [BiodiversityFact]),
    Conservation(&'static ConservationReport),
    Links(&'static [EnvironmentalLink]),
    Help,
}

/// Every key has content; this never fails.
pub fn content_for(topic: TopicKey) -> TopicContent {
    match topic {
        TopicKey::Air => TopicContent::AirQuality(&AIR_QUALITY),
        TopicKey::Water => TopicContent::WaterQuality(&WATER_QUALITY),
        TopicKey::Temperature => TopicContent::Temperature(&TEMPERATURE),
        TopicKey::FaunaFlora => TopicContent::Biodiversity(&BIODIVERSITY_FACTS),
        TopicKey::Conservation => TopicContent::Conservation(&CONSERVATION),
        TopicKey::Links => TopicContent::Links(&ENVIRONMENTAL_LINKS),
        TopicKey::Help => TopicContent::Help,
    }
}

// =============================================================================
// Datasets
// =============================================================================

pub static AIR_QUALITY: AirQualityReport = AirQualityReport {
    regions: &[
        AirRegion {
            name: "São Paulo - Centro",
            quality: "Moderada",
            pm25: 18.2,
            pm10: 39.5,
            no2: 45.2,
            o3: 62.3,
            description: "A qualidade do ar apresenta níveis moderados de poluição, especialmente nos horários de pico. Pessoas sensíveis devem limitar atividades ao ar livre.",
        },
        AirRegion {
            name: "Rio de Janeiro - Zona Sul",
            quality: "Boa",
            pm25: 9.8,
            pm10: 22.1,
            no2: 32.7,
            o3: 48.5,
            description: "A qualidade do ar é considerada satisfatória, com baixo potencial de danos à saúde pública.",
        },
        AirRegion {
            name: "Brasília - Plano Piloto",
            quality: "Boa",
            pm25: 7.2,
            pm10: 18.6,
            no2: 21.3,
            o3: 42.9,
            description: "A qualidade do ar é boa durante a maior parte do ano, exceto em períodos de seca intensa.",
        },
        AirRegion {
            name: "Manaus - Centro",
            quality: "Moderada",
            pm25: 14.8,
            pm10: 31.2,
            no2: 29.8,
            o3: 55.6,
            description: "A qualidade do ar varia conforme a estação, com piora significativa durante períodos de queimadas na região amazônica.",
        },
        AirRegion {
            name: "Porto Alegre - Centro",
            quality: "Boa",
            pm25: 10.3,
            pm10: 25.7,
            no2: 27.9,
            o3: 45.2,
            description: "A qualidade do ar é geralmente boa, com episódios de poluição associados a inversões térmicas no inverno.",
        },
    ],
    last_updated: "13/05/2025",
    source: "Monitores ambientais das principais capitais brasileiras",
};

pub static WATER_QUALITY: WaterQualityReport = WaterQualityReport {
    bodies: &[
        WaterBody {
            name: "Rio Tietê - São Paulo",
            quality: "Ruim",
            ph: 6.2,
            oxygen: "3.1 mg/L",
            temperature: 23.4,
            description: "O rio ainda apresenta altos níveis de poluição, especialmente em trechos que cortam áreas urbanas densas. Projetos de despoluição continuam em andamento.",
        },
        WaterBody {
            name: "Baía de Guanabara - Rio de Janeiro",
            quality: "Moderada a Ruim",
            ph: 7.1,
            oxygen: "4.2 mg/L",
            temperature: 25.8,
            description: "A qualidade da água varia significativamente entre diferentes pontos da baía, com áreas próximas à desembocadura de rios urbanos apresentando maior poluição.",
        },
        WaterBody {
            name: "Lago Paranoá - Brasília",
            quality: "Boa",
            ph: 7.8,
            oxygen: "6.9 mg/L",
            temperature: 22.5,
            description: "A qualidade da água é considerada boa para recreação de contato primário na maior parte do lago, com episódios ocasionais de floração de algas.",
        },
        WaterBody {
            name: "Rio Negro - Manaus",
            quality: "Excelente",
            // Naturally acidic.
            ph: 5.2,
            oxygen: "5.8 mg/L",
            temperature: 28.1,
            description: "O Rio Negro mantém excelente qualidade de água, com baixa interferência humana em sua composição natural.",
        },
        WaterBody {
            name: "Lago Guaíba - Porto Alegre",
            quality: "Moderada",
            ph: 6.8,
            oxygen: "5.1 mg/L",
            temperature: 21.2,
            description: "A qualidade varia sazonalmente e é afetada pelo aporte de contaminantes de áreas urbanas e industriais no entorno.",
        },
    ],
    last_updated: "10/05/2025",
    source: "Agência Nacional de Águas e órgãos ambientais estaduais",
};

pub static TEMPERATURE: TemperatureReport = TemperatureReport {
    trends: &[
        TemperatureTrend {
            region: "Sudeste",
            average: "21.8°C",
            increase: "+1.2°C nos últimos 50 anos",
            description: "O aumento de temperatura é mais perceptível nas grandes áreas urbanas, onde o efeito de ilha de calor intensifica o aquecimento.",
        },
        TemperatureTrend {
            region: "Nordeste",
            average: "26.5°C",
            increase: "+0.9°C nos últimos 50 anos",
            description: "Regiões semiáridas têm apresentado aumento nas temperaturas máximas e períodos de seca mais prolongados.",
        },
        TemperatureTrend {
            region: "Norte",
            average: "27.1°C",
            increase: "+1.1°C nos últimos 50 anos",
            description: "Alterações no ciclo hidrológico têm sido observadas, com impactos nas vazões de rios e na sazonalidade das chuvas.",
        },
        TemperatureTrend {
            region: "Sul",
            average: "18.3°C",
            increase: "+0.8°C nos últimos 50 anos",
            description: "Aumento na frequência de eventos extremos, como chuvas intensas e períodos de estiagem severa.",
        },
        TemperatureTrend {
            region: "Centro-Oeste",
            average: "24.7°C",
            increase: "+1.3°C nos últimos 50 anos",
            description: "Alterações nos padrões de precipitação têm impactado a agricultura e os biomas naturais da região.",
        },
    ],
    projection: "Modelos climáticos indicam aumento médio de 1.5°C a 3.5°C até 2100, dependendo das emissões de gases de efeito estufa.",
    last_updated: "05/05/2025",
    source: "Instituto Nacional de Meteorologia e Painel Brasileiro de Mudanças Climáticas",
};

pub static BIODIVERSITY_FACTS: [BiodiversityFact; 5] = [
    BiodiversityFact {
        category: FactCategory::Fauna,
        title: "Amazônia",
        fact: "A Amazônia abriga mais de 2.000 espécies de peixes e 1.300 espécies de aves, sendo a região com maior biodiversidade do planeta.",
    },
    BiodiversityFact {
        category: FactCategory::Flora,
        title: "Mata Atlântica",
        fact: "A Mata Atlântica possui mais de 20.000 espécies de plantas, das quais 8.000 são endêmicas, ou seja, só existem nesse bioma.",
    },
    BiodiversityFact {
        category: FactCategory::Fauna,
        title: "Cerrado",
        fact: "O lobo-guará, símbolo do Cerrado, está ameaçado de extinção com menos de 25.000 indivíduos na natureza.",
    },
    BiodiversityFact {
        category: FactCategory::Flora,
        title: "Pantanal",
        fact: "Durante as cheias, o Pantanal pode ficar com até 80% de sua área inundada, criando um dos maiores sistemas de áreas úmidas do mundo.",
    },
    BiodiversityFact {
        category: FactCategory::Fauna,
        title: "Mico-leão-dourado",
        fact: "O mico-leão-dourado é um caso de sucesso de conservação. Em 1970 havia apenas 200 indivíduos, hoje são mais de 3.200 na natureza.",
    },
];

pub static CONSERVATION: ConservationReport = ConservationReport {
    areas: &[
        ConservationArea {
            name: "Unidades de Conservação Federais",
            area: "195 milhões de hectares",
            percentage: "22.9% do território nacional",
            description: "Divididas em Unidades de Proteção Integral e Unidades de Uso Sustentável, protegem ecossistemas representativos e garantem a manutenção da biodiversidade.",
        },
        ConservationArea {
            name: "Terras Indígenas",
            area: "117 milhões de hectares",
            percentage: "13.8% do território nacional",
            description: "Áreas habitadas por povos indígenas que contribuem significativamente para a conservação ambiental, especialmente na Amazônia.",
        },
        ConservationArea {
            name: "Reservas Particulares do Patrimônio Natural",
            area: "0.5 milhão de hectares",
            percentage: "0.06% do território nacional",
            description: "Áreas privadas dedicadas à conservação da biodiversidade, complementando o sistema público de áreas protegidas.",
        },
    ],
    challenges: "Pressões de desmatamento, mineração ilegal, grilagem de terras e redução de orçamento para fiscalização e gestão ambiental.",
    last_updated: "01/05/2025",
    source: "Ministério do Meio Ambiente e Instituto Chico Mendes de Conservação da Biodiversidade",
};

pub static ENVIRONMENTAL_LINKS: [EnvironmentalLink; 5] = [
    EnvironmentalLink {
        title: "INPE - Instituto Nacional de Pesquisas Espaciais",
        url: "https://www.gov.br/inpe/pt-br",
        description: "Dados oficiais sobre desmatamento, queimadas e qualidade do ar no Brasil",
    },
    EnvironmentalLink {
        title: "Sistema de Informações Ambientais - SISAM",
        url: "https://queimadas.dgi.inpe.br/queimadas/sisam/",
        description: "Monitoramento da qualidade do ar e impactos na saúde",
    },
    EnvironmentalLink {
        title: "Ministério do Meio Ambiente",
        url: "https://www.gov.br/mma/pt-br",
        description: "Portal com informações sobre políticas ambientais e conservação",
    },
    EnvironmentalLink {
        title: "IBAMA - Instituto Brasileiro do Meio Ambiente",
        url: "https://www.gov.br/ibama/pt-br",
        description: "Dados sobre fiscalização ambiental e licenciamento",
    },
    EnvironmentalLink {
        title: "ANA - Agência Nacional de Águas",
        url: "https://www.gov.br/ana/pt-br",
        description: "Informações sobre recursos hídricos e qualidade da água no Brasil",
    },
];
