//! Static lookup tables for value rendering.

/// Specialized array renderers, selected by field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayRenderer {
    Documents,
    ProcessHistory,
    Identifiers,
    SummaryItems,
}

/// Specialized object composers, selected by field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectComposer {
    /// Decay, efficiency and scenario metrics.
    Metrics,
    /// Emissions and soil-carbon metrics.
    Emissions,
    /// Supply or tenure arrangement.
    Arrangement,
    /// Calculation parameters.
    CalculationParameters,
}

/// Link icon used when no table entry matches.
pub const DEFAULT_ICON: &str = "🔗";

const ICONS: &[(&str, &str)] = &[
    ("harvester", "🪓"),
    ("operator", "👷"),
    ("organization", "🏢"),
    ("supplier", "🏢"),
    ("customer", "🏢"),
    ("geographic", "📍"),
    ("location", "📍"),
    ("certificate", "📜"),
    ("certification", "📜"),
    ("material", "🪵"),
    ("species", "🌲"),
    ("transaction", "💱"),
    ("process", "⚙️"),
    ("equipment", "🚜"),
    ("transport", "🚚"),
    ("document", "📄"),
    ("claim", "✅"),
    ("audit", "🔍"),
];

const DISPLAY_KEYS: &[&str] = &[
    "id",
    "traceableUnitId",
    "harvesterId",
    "operatorId",
    "organizationId",
    "certificateId",
    "transactionId",
    "materialTypeId",
    "speciesId",
    "name",
    "type",
    "@id",
    "@type",
];

const ARRAY_ROUTES: &[(&str, ArrayRenderer)] = &[
    ("supportingDocuments", ArrayRenderer::Documents),
    ("documents", ArrayRenderer::Documents),
    ("documentReferences", ArrayRenderer::Documents),
    ("attachments", ArrayRenderer::Documents),
    ("processHistory", ArrayRenderer::ProcessHistory),
    ("processingHistory", ArrayRenderer::ProcessHistory),
    ("processSteps", ArrayRenderer::ProcessHistory),
    ("uniqueIdentifiers", ArrayRenderer::Identifiers),
    ("identifiers", ArrayRenderer::Identifiers),
    ("alternateIdentifiers", ArrayRenderer::Identifiers),
    ("summaryItems", ArrayRenderer::SummaryItems),
    ("speciesComposition", ArrayRenderer::SummaryItems),
    ("volumeBreakdown", ArrayRenderer::SummaryItems),
    ("productSummary", ArrayRenderer::SummaryItems),
];

const OBJECT_ROUTES: &[(&str, ObjectComposer)] = &[
    ("decayMetrics", ObjectComposer::Metrics),
    ("efficiencyMetrics", ObjectComposer::Metrics),
    ("scenarioMetrics", ObjectComposer::Metrics),
    ("lcaMetrics", ObjectComposer::Metrics),
    ("emissionsData", ObjectComposer::Emissions),
    ("emissionsMetrics", ObjectComposer::Emissions),
    ("carbonMetrics", ObjectComposer::Emissions),
    ("soilCarbonMetrics", ObjectComposer::Emissions),
    ("arrangement", ObjectComposer::Arrangement),
    ("supplyArrangement", ObjectComposer::Arrangement),
    ("contractualArrangement", ObjectComposer::Arrangement),
    ("tenureArrangement", ObjectComposer::Arrangement),
    ("calculationParameters", ObjectComposer::CalculationParameters),
    ("calculationInputs", ObjectComposer::CalculationParameters),
    ("modelParameters", ObjectComposer::CalculationParameters),
];

const SCENARIO_LABELS: &[(&str, &str)] = &[
    ("baseline", "Baseline"),
    ("bau", "Business as usual"),
    ("business_as_usual", "Business as usual"),
    ("optimized", "Optimized"),
    ("conservative", "Conservative"),
    ("aggressive", "Aggressive"),
    ("counterfactual", "Counterfactual"),
];

const ARRANGEMENT_LABELS: &[(&str, &str)] = &[
    ("long_term_contract", "Long-term contract"),
    ("spot_purchase", "Spot purchase"),
    ("cooperative", "Cooperative"),
    ("lease", "Lease"),
    ("ownership", "Ownership"),
    ("concession", "Concession"),
];

/// Icons, labels, display-key priority and renderer routing.
///
/// Immutable after construction; build once and share by reference.
#[derive(Debug, Clone)]
pub struct FormatTables {
    icons: &'static [(&'static str, &'static str)],
    display_keys: &'static [&'static str],
    array_routes: &'static [(&'static str, ArrayRenderer)],
    object_routes: &'static [(&'static str, ObjectComposer)],
    scenario_labels: &'static [(&'static str, &'static str)],
    arrangement_labels: &'static [(&'static str, &'static str)],
}

impl Default for FormatTables {
    fn default() -> Self {
        Self {
            icons: ICONS,
            display_keys: DISPLAY_KEYS,
            array_routes: ARRAY_ROUTES,
            object_routes: OBJECT_ROUTES,
            scenario_labels: SCENARIO_LABELS,
            arrangement_labels: ARRANGEMENT_LABELS,
        }
    }
}

impl FormatTables {
    /// Icon for an identifier field: first table entry whose key occurs in
    /// the lowercased field name.
    pub fn icon_for(&self, field_name: &str) -> &'static str {
        let lower = field_name.to_ascii_lowercase();
        self.icons
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, icon)| *icon)
            .unwrap_or(DEFAULT_ICON)
    }

    /// Keys tried, in order, to pick a representative value for an object.
    pub fn display_keys(&self) -> &'static [&'static str] {
        self.display_keys
    }

    pub fn array_renderer(&self, field_name: &str) -> Option<ArrayRenderer> {
        lookup(self.array_routes, field_name)
    }

    pub fn object_composer(&self, field_name: &str) -> Option<ObjectComposer> {
        lookup(self.object_routes, field_name)
    }

    pub fn scenario_label(&self, raw: &str) -> String {
        label(self.scenario_labels, raw)
    }

    pub fn arrangement_label(&self, raw: &str) -> String {
        label(self.arrangement_labels, raw)
    }
}

fn lookup<T: Copy>(routes: &[(&str, T)], field_name: &str) -> Option<T> {
    routes
        .iter()
        .find(|(name, _)| *name == field_name)
        .map(|(_, route)| *route)
}

/// Table label, or the raw code with separators spaced and the first
/// letter capitalized.
fn label(table: &[(&str, &str)], raw: &str) -> String {
    let key = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
    if let Some((_, label)) = table.iter().find(|(code, _)| *code == key) {
        return (*label).to_string();
    }
    let spaced = raw.trim().replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
