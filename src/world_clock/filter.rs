use serde::Serialize;

use super::zones::Region;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneVisibility {
    pub id: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegionVisibility {
    pub name: String,
    pub visible: bool,
    pub zones: Vec<ZoneVisibility>,
}

/// Visibility flags for a search query. Computing it never touches the
/// zones themselves.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterView {
    pub query: String,
    pub regions: Vec<RegionVisibility>,
}

impl FilterView {
    pub fn is_zone_visible(&self, id: &str) -> bool {
        self.regions
            .iter()
            .flat_map(|region| region.zones.iter())
            .any(|zone| zone.id == id && zone.visible)
    }

    pub fn is_region_visible(&self, name: &str) -> bool {
        self.regions
            .iter()
            .any(|region| region.name == name && region.visible)
    }

    pub fn visible_zone_ids(&self) -> impl Iterator<Item = &str> {
        self.regions
            .iter()
            .flat_map(|region| region.zones.iter())
            .filter(|zone| zone.visible)
            .map(|zone| zone.id.as_str())
    }
}

/// `needle` must already be lowercased. An empty needle matches everything.
pub fn zone_matches(needle: &str, display_name: &str, region: &str) -> bool {
    needle.is_empty()
        || display_name.to_lowercase().contains(needle)
        || region.to_lowercase().contains(needle)
}

pub fn filter_regions(regions: &[Region], query: &str) -> FilterView {
    let needle = query.trim().to_lowercase();

    let regions = regions
        .iter()
        .map(|region| {
            let zones: Vec<ZoneVisibility> = region
                .zones
                .iter()
                .map(|zone| ZoneVisibility {
                    id: zone.id.clone(),
                    visible: zone_matches(&needle, &zone.display_name, &region.name),
                })
                .collect();
            let visible = zones.iter().any(|zone| zone.visible)
                || region.name.to_lowercase().contains(&needle);
            RegionVisibility {
                name: region.name.clone(),
                visible,
                zones,
            }
        })
        .collect();

    FilterView {
        query: query.to_string(),
        regions,
    }
}
