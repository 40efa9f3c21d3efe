//! Fixed catalog of oil profiles and the selection menu.

use crate::OilProfile;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Oil selected when the menu input is unusable.
pub const DEFAULT_OIL: &str = "Lavande";

/// Selectable oils, in menu order. Not every entry has a dedicated profile.
pub const MENU: [&str; 20] = [
    "Lavande",
    "Menthe Poivrée",
    "Arbre à Thé",
    "Eucalyptus",
    "Ravintsara",
    "Palmarosa",
    "Ylang-Ylang",
    "Girofle",
    "Citron",
    "Romarin",
    "Tea Tree",
    "Géranium",
    "Camomille",
    "Sauge",
    "Niaouli",
    "Basilic",
    "Cèdre",
    "Encens",
    "Myrrhe",
    "Vetiver",
];

fn profile(
    production_base: f64,
    price_base: f64,
    category: &str,
    properties: &[&str],
    regions: &[&str],
    extraction_yield: f64,
) -> OilProfile {
    OilProfile {
        production_base,
        price_base,
        category: category.to_string(),
        properties: properties.iter().map(|s| s.to_string()).collect(),
        regions: regions.iter().map(|s| s.to_string()).collect(),
        extraction_yield,
    }
}

/// Returns the dedicated profile for `name`, if the catalog has one.
///
/// Matching is exact, accents and case included.
pub fn profile_for(name: &str) -> Option<OilProfile> {
    let p = match name {
        "Lavande" => profile(
            150.0,
            45.0,
            "relaxante",
            &["calmante", "cicatrisante", "antiseptique", "analgésique"],
            &["France", "Bulgarie", "Chine"],
            0.015,
        ),
        "Menthe Poivrée" => profile(
            80.0,
            60.0,
            "tonique",
            &["digestive", "rafraichissante", "antalgique", "decongestionnante"],
            &["USA", "France", "Inde"],
            0.012,
        ),
        "Arbre à Thé" => profile(
            120.0,
            35.0,
            "antiseptique",
            &["antibacterienne", "antifongique", "antivirale", "immunostimulante"],
            &["Australie", "Chine", "Afrique du Sud"],
            0.020,
        ),
        "Eucalyptus" => profile(
            200.0,
            25.0,
            "respiratoire",
            &["expectorante", "decongestionnante", "antiseptique", "febrifuge"],
            &["Australie", "Chine", "Portugal"],
            0.018,
        ),
        "Ravintsara" => profile(
            40.0,
            55.0,
            "immunitaire",
            &["antivirale", "immunostimulante", "expectorante", "neurotonique"],
            &["Madagascar", "Comores"],
            0.008,
        ),
        "Palmarosa" => profile(
            25.0,
            70.0,
            "cosmetique",
            &["regenerante", "hydratante", "antibacterienne", "equilibrante"],
            &["Inde", "Nepal", "Indonesie"],
            0.006,
        ),
        "Ylang-Ylang" => profile(
            30.0,
            85.0,
            "aphrodisiaque",
            &["aphrodisiaque", "sedative", "hypotensive", "regulatrice"],
            &["Madagascar", "Comores", "Mayotte"],
            0.005,
        ),
        "Girofle" => profile(
            60.0,
            40.0,
            "antiseptique",
            &["antiseptique", "antalgique", "antiparasitaire", "stimulante"],
            &["Madagascar", "Indonesie", "Sri Lanka"],
            0.015,
        ),
        "Citron" => profile(
            180.0,
            20.0,
            "detoxifiante",
            &["antibacterienne", "detoxifiante", "tonique", "digestive"],
            &["Italie", "Espagne", "USA", "Argentine"],
            0.003,
        ),
        "Romarin" => profile(
            90.0,
            38.0,
            "tonique",
            &["tonique", "hepatique", "neurotonique", "antioxydante"],
            &["France", "Espagne", "Maroc", "Tunisie"],
            0.010,
        ),
        _ => return None,
    };
    Some(p)
}

/// Generic profile used for any oil without a dedicated entry.
pub fn default_profile() -> OilProfile {
    profile(
        50.0,
        50.0,
        "polyvalente",
        &["antibacterienne", "antioxydante"],
        &["Divers"],
        0.010,
    )
}

/// Resolves `name` to its profile, silently falling back to the default.
pub fn resolve_profile(name: &str) -> OilProfile {
    profile_for(name).unwrap_or_else(|| {
        debug!(oil = name, "no dedicated profile, using default");
        default_profile()
    })
}

/// Menu entry for a 1-based answer, ignoring surrounding whitespace.
pub fn menu_entry(input: &str) -> Option<&'static str> {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=MENU.len()).contains(&n) => Some(MENU[n - 1]),
        _ => None,
    }
}

/// Maps a 1-based menu answer to an oil name.
///
/// Anything that is not an integer within the menu bounds selects
/// [`DEFAULT_OIL`].
pub fn choose_from_menu(input: &str) -> &'static str {
    menu_entry(input).unwrap_or(DEFAULT_OIL)
}

/// A selected oil: the name as chosen plus its resolved profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Oil {
    pub name: String,
    pub profile: OilProfile,
    /// Set when `name` has no dedicated profile.
    pub uses_default_profile: bool,
}

impl Oil {
    pub fn resolve(name: &str) -> Self {
        let dedicated = profile_for(name);
        let uses_default_profile = dedicated.is_none();
        Self {
            name: name.to_string(),
            profile: dedicated.unwrap_or_else(|| resolve_profile(name)),
            uses_default_profile,
        }
    }
}
