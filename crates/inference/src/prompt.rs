//! Location-resolution policy and its rendering into prompt text.

use geofeed_core::UNKNOWN_ADDRESS;

/// Granularity levels, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPriority {
    BuildingOrStreet,
    Organization,
    City,
    Country,
}

impl LocationPriority {
    pub const ORDER: [LocationPriority; 4] = [
        Self::BuildingOrStreet,
        Self::Organization,
        Self::City,
        Self::Country,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::BuildingOrStreet => "specific building or street",
            Self::Organization => "named organization or company",
            Self::City => "city",
            Self::Country => "country",
        }
    }
}

/// Steps tried, in order, when the text names no usable place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTier {
    /// Financial instruments resolve to the city of their main exchange.
    Exchange,
    /// Policy and regulation resolve to the seat of the issuing authority.
    IssuingAuthority,
    /// Corporate news resolves to the company's global or regional headquarters.
    CorporateHeadquarters,
    /// Nothing applies.
    Unknown,
}

impl FallbackTier {
    pub const LADDER: [FallbackTier; 4] = [
        Self::Exchange,
        Self::IssuingAuthority,
        Self::CorporateHeadquarters,
        Self::Unknown,
    ];

    pub fn instruction(&self) -> String {
        match self {
            Self::Exchange => "Market quotes and contracts: locate the headquarters city of the \
                main exchange for that instrument (copper or Shanghai gold -> Shanghai; \
                Brent crude -> London; US equities -> New York)."
                .to_string(),
            Self::IssuingAuthority => "Policy or regulatory announcements: locate the seat of the \
                highest authority that issued it."
                .to_string(),
            Self::CorporateHeadquarters => "Company news: locate the company's global or regional \
                headquarters."
                .to_string(),
            Self::Unknown => format!(
                "Only if none of the above yields a place (e.g. purely theoretical discussion), \
                 return {{\"address\": \"{UNKNOWN_ADDRESS}\", \"lat\": 0, \"lng\": 0}}."
            ),
        }
    }
}

/// The full instruction set sent as the system message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPolicy {
    pub priorities: Vec<LocationPriority>,
    pub fallback: Vec<FallbackTier>,
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            priorities: LocationPriority::ORDER.to_vec(),
            fallback: FallbackTier::LADDER.to_vec(),
        }
    }
}

impl ResolutionPolicy {
    pub fn system_instruction(&self) -> String {
        let priorities = self
            .priorities
            .iter()
            .map(LocationPriority::label)
            .collect::<Vec<_>>()
            .join(" > ");

        let mut out = String::from(
            "You are a geospatial intelligence analyst. Extract the single most relevant \
             location where the news item takes place and convert it to coordinates.\n\
             Rules:\n",
        );
        out.push_str(&format!("1. Location priority: {priorities}.\n"));
        out.push_str(
            "2. Multi-location events (diplomacy, conflict): use the location of the main \
             reporting institution or the first incident site.\n\
             3. Coordinates must be WGS84 latitude and longitude (lat, lng).\n\
             4. The address keeps the place name as written in the text, or a clear Chinese rendering.\n\
             5. Reply with exactly one JSON object {\"address\": string, \"lat\": number, \"lng\": number}, \
             with no markdown fences and no explanation.\n",
        );

        if !self.fallback.is_empty() {
            out.push_str("When no place can be determined, trace it as follows:\n");
            for (i, tier) in self.fallback.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", i + 1, tier.instruction()));
            }
        }

        out
    }
}

/// The per-item user message.
pub fn user_message(text: &str) -> String {
    format!(
        "Analyse this news item. First consider: who is speaking, where are they speaking, \
         and which concrete places are involved? Then output the JSON:\n{text}"
    )
}
