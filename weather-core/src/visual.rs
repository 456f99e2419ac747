//! Closed lookup tables from upstream codes to display visuals.

use crate::model::ConditionCategory;

/// Local icon identifier plus display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconVisual {
    pub icon: &'static str,
    pub color: &'static str,
}

pub const FALLBACK_ICON: IconVisual = IconVisual {
    icon: "fa-question",
    color: "#4f46e5",
};

/// Icon shown for every demo reading.
pub const DEMO_ICON: IconVisual = IconVisual {
    icon: "fa-cloud-sun",
    color: "#fbbf24",
};

/// Upstream icon code used for demo entries, maps to [`DEMO_ICON`].
pub const DEMO_ICON_CODE: &str = "02d";

/// Every upstream icon code the table knows.
pub const KNOWN_ICON_CODES: [&str; 18] = [
    "01d", "01n", "02d", "02n", "03d", "03n", "04d", "04n", "09d", "09n", "10d", "10n", "11d",
    "11n", "13d", "13n", "50d", "50n",
];

/// Map an upstream icon code to a visual. Total: unknown codes get [`FALLBACK_ICON`].
pub fn icon_visual(code: &str) -> IconVisual {
    let (icon, color) = match code {
        "01d" => ("fa-sun", "#f59e0b"),
        "01n" => ("fa-moon", "#cbd5e1"),
        "02d" => ("fa-cloud-sun", "#fbbf24"),
        "02n" => ("fa-cloud-moon", "#a5b4fc"),
        "03d" => ("fa-cloud", "#94a3b8"),
        "03n" => ("fa-cloud", "#7c8aa0"),
        "04d" => ("fa-cloud", "#64748b"),
        "04n" => ("fa-cloud", "#475569"),
        "09d" => ("fa-cloud-showers-heavy", "#3b82f6"),
        "09n" => ("fa-cloud-showers-heavy", "#2563eb"),
        "10d" => ("fa-cloud-sun-rain", "#60a5fa"),
        "10n" => ("fa-cloud-moon-rain", "#818cf8"),
        "11d" => ("fa-bolt", "#8b5cf6"),
        "11n" => ("fa-bolt", "#7c3aed"),
        "13d" => ("fa-snowflake", "#93c5fd"),
        "13n" => ("fa-snowflake", "#bfdbfe"),
        "50d" => ("fa-smog", "#9ca3af"),
        "50n" => ("fa-smog", "#6b7280"),
        _ => return FALLBACK_ICON,
    };
    IconVisual { icon, color }
}

const CLEAR_GRADIENT: &str = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)";

/// Page background for a condition category. `Other` shares the Clear gradient.
pub fn background_for(category: ConditionCategory) -> &'static str {
    match category {
        ConditionCategory::Clear => CLEAR_GRADIENT,
        ConditionCategory::Clouds => "linear-gradient(135deg, #4f46e5 0%, #7c3aed 100%)",
        ConditionCategory::Rain => "linear-gradient(135deg, #3b82f6 0%, #1d4ed8 100%)",
        ConditionCategory::Drizzle => "linear-gradient(135deg, #60a5fa 0%, #2563eb 100%)",
        ConditionCategory::Thunderstorm => "linear-gradient(135deg, #4c1d95 0%, #1e1b4b 100%)",
        ConditionCategory::Snow => "linear-gradient(135deg, #93c5fd 0%, #60a5fa 100%)",
        ConditionCategory::Mist => "linear-gradient(135deg, #94a3b8 0%, #64748b 100%)",
        ConditionCategory::Fog => "linear-gradient(135deg, #cbd5e1 0%, #94a3b8 100%)",
        ConditionCategory::Other => CLEAR_GRADIENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_known_code_has_its_own_visual() {
        for code in KNOWN_ICON_CODES {
            assert_ne!(icon_visual(code), FALLBACK_ICON, "code {code} fell through");
        }
    }

    #[test]
    fn unknown_codes_get_the_fallback() {
        assert_eq!(icon_visual("99z"), FALLBACK_ICON);
        assert_eq!(icon_visual(""), FALLBACK_ICON);
        assert_eq!(icon_visual("01D"), FALLBACK_ICON);
    }

    #[test]
    fn demo_icon_code_maps_to_demo_icon() {
        assert_eq!(icon_visual(DEMO_ICON_CODE), DEMO_ICON);
    }

    #[test]
    fn named_categories_have_distinct_gradients() {
        let named = [
            ConditionCategory::Clear,
            ConditionCategory::Clouds,
            ConditionCategory::Rain,
            ConditionCategory::Drizzle,
            ConditionCategory::Thunderstorm,
            ConditionCategory::Snow,
            ConditionCategory::Mist,
            ConditionCategory::Fog,
        ];
        let gradients: HashSet<_> = named.iter().map(|c| background_for(*c)).collect();
        assert_eq!(gradients.len(), named.len());
    }

    #[test]
    fn other_category_uses_clear_gradient() {
        assert_eq!(
            background_for(ConditionCategory::Other),
            background_for(ConditionCategory::Clear)
        );
    }
}
