use std::collections::BTreeMap;

use chrono::{DateTime, Offset, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::clock::TIME_OF_DAY_FORMAT;

/// Continent-like areas of the IANA database. Legacy country and `Etc`
/// groupings fall outside this list.
pub const CONTINENTS: [&str; 10] = [
    "Africa",
    "America",
    "Antarctica",
    "Arctic",
    "Asia",
    "Atlantic",
    "Australia",
    "Europe",
    "Indian",
    "Pacific",
];

/// Backward-compatible links that duplicate a canonical zone in the same area.
const LEGACY_ALIASES: &[&str] = &[
    "Africa/Asmera",
    "Africa/Timbuktu",
    "America/Argentina/ComodRivadavia",
    "America/Atka",
    "America/Buenos_Aires",
    "America/Catamarca",
    "America/Coral_Harbour",
    "America/Cordoba",
    "America/Ensenada",
    "America/Fort_Wayne",
    "America/Godthab",
    "America/Indianapolis",
    "America/Jujuy",
    "America/Knox_IN",
    "America/Louisville",
    "America/Mendoza",
    "America/Montreal",
    "America/Nipigon",
    "America/Pangnirtung",
    "America/Porto_Acre",
    "America/Rainy_River",
    "America/Rosario",
    "America/Santa_Isabel",
    "America/Shiprock",
    "America/Thunder_Bay",
    "America/Virgin",
    "America/Yellowknife",
    "Antarctica/South_Pole",
    "Asia/Ashkhabad",
    "Asia/Calcutta",
    "Asia/Chongqing",
    "Asia/Chungking",
    "Asia/Dacca",
    "Asia/Harbin",
    "Asia/Istanbul",
    "Asia/Kashgar",
    "Asia/Katmandu",
    "Asia/Macao",
    "Asia/Rangoon",
    "Asia/Saigon",
    "Asia/Tel_Aviv",
    "Asia/Thimbu",
    "Asia/Ujung_Pandang",
    "Asia/Ulan_Bator",
    "Atlantic/Faeroe",
    "Atlantic/Jan_Mayen",
    "Australia/ACT",
    "Australia/Canberra",
    "Australia/Currie",
    "Australia/LHI",
    "Australia/NSW",
    "Australia/North",
    "Australia/Queensland",
    "Australia/South",
    "Australia/Tasmania",
    "Australia/Victoria",
    "Australia/West",
    "Australia/Yancowinna",
    "Europe/Belfast",
    "Europe/Kiev",
    "Europe/Nicosia",
    "Europe/Tiraspol",
    "Europe/Uzhgorod",
    "Europe/Zaporozhye",
    "Pacific/Enderbury",
    "Pacific/Johnston",
    "Pacific/Ponape",
    "Pacific/Samoa",
    "Pacific/Truk",
    "Pacific/Yap",
];

/// One IANA zone on the world clock.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimezoneEntry {
    pub id: String,
    pub region: String,
    pub display_name: String,
    /// Local time at the last refresh. Derived; empty until the first one.
    pub rendered_time: String,
    /// Offset from UTC applied at the last refresh, DST included.
    pub utc_offset_secs: i32,
    #[serde(skip)]
    tz: Tz,
}

impl TimezoneEntry {
    /// `None` for identifiers outside the continent areas (`UTC`, `US/Pacific`,
    /// `Etc/GMT+5`) and for legacy aliases such as `Asia/Calcutta`.
    pub fn from_zone(tz: Tz) -> Option<Self> {
        let id = tz.name();
        let (region, place) = id.split_once('/')?;
        if !CONTINENTS.contains(&region) || LEGACY_ALIASES.contains(&id) {
            return None;
        }
        Some(Self {
            id: id.to_string(),
            region: region.to_string(),
            display_name: place.replace('_', " "),
            rendered_time: String::new(),
            utc_offset_secs: 0,
            tz,
        })
    }

    fn render(&mut self, instant: DateTime<Utc>) {
        let local = instant.with_timezone(&self.tz);
        self.utc_offset_secs = local.offset().fix().local_minus_utc();
        self.rendered_time = local.format(TIME_OF_DAY_FORMAT).to_string();
    }

    pub fn reading(&self) -> ZoneReading {
        ZoneReading {
            id: self.id.clone(),
            time: self.rendered_time.clone(),
            utc_offset_secs: self.utc_offset_secs,
        }
    }
}

/// Per-tick world clock output for one zone.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneReading {
    pub id: String,
    pub time: String,
    pub utc_offset_secs: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Region {
    pub name: String,
    pub zones: Vec<TimezoneEntry>,
}

/// The fixed set of zones, grouped by region. Regions are sorted by name and
/// zones by id; the set never changes after construction.
#[derive(Debug, Clone)]
pub struct WorldClock {
    regions: Vec<Region>,
    last_refresh: Option<DateTime<Utc>>,
}

impl WorldClock {
    /// Loads every canonical continent zone from the bundled IANA database,
    /// keeping only `allowed_regions` when that list is non-empty.
    pub fn load(allowed_regions: &[String]) -> Self {
        Self::from_zones(chrono_tz::TZ_VARIANTS.iter().copied(), allowed_regions)
    }

    pub fn from_zones<I>(zones: I, allowed_regions: &[String]) -> Self
    where
        I: IntoIterator<Item = Tz>,
    {
        let mut grouped: BTreeMap<String, BTreeMap<String, TimezoneEntry>> = BTreeMap::new();
        for entry in zones.into_iter().filter_map(TimezoneEntry::from_zone) {
            if !allowed_regions.is_empty() && !allowed_regions.contains(&entry.region) {
                continue;
            }
            grouped
                .entry(entry.region.clone())
                .or_default()
                .insert(entry.id.clone(), entry);
        }

        let regions = grouped
            .into_iter()
            .map(|(name, zones)| Region {
                name,
                zones: zones.into_values().collect(),
            })
            .collect();

        Self {
            regions,
            last_refresh: None,
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn zone_count(&self) -> usize {
        self.regions.iter().map(|region| region.zones.len()).sum()
    }

    pub fn zones(&self) -> impl Iterator<Item = &TimezoneEntry> {
        self.regions.iter().flat_map(|region| region.zones.iter())
    }

    pub fn find(&self, id: &str) -> Option<&TimezoneEntry> {
        self.zones().find(|entry| entry.id == id)
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    /// Re-renders every zone from the one `instant`.
    pub fn refresh(&mut self, instant: DateTime<Utc>) {
        for entry in self
            .regions
            .iter_mut()
            .flat_map(|region| region.zones.iter_mut())
        {
            entry.render(instant);
        }
        self.last_refresh = Some(instant);
    }

    pub fn readings(&self) -> Vec<ZoneReading> {
        self.zones().map(TimezoneEntry::reading).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use chrono_tz::{America, Asia, Europe};

    fn sample() -> WorldClock {
        WorldClock::from_zones(
            [
                Europe::Paris,
                America::New_York,
                Europe::London,
                Asia::Tokyo,
                Tz::UTC,
                America::Argentina::Buenos_Aires,
            ],
            &[],
        )
    }

    #[test]
    fn groups_by_region_and_sorts_within_region() {
        let world = sample();
        let names: Vec<_> = world.regions().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["America", "Asia", "Europe"]);

        let europe: Vec<_> = world.regions()[2].zones.iter().map(|z| z.id.as_str()).collect();
        assert_eq!(europe, ["Europe/London", "Europe/Paris"]);
        assert_eq!(world.zone_count(), 5);
    }

    #[test]
    fn zones_without_region_are_skipped() {
        assert!(TimezoneEntry::from_zone(Tz::UTC).is_none());
        assert!(sample().find("UTC").is_none());
    }

    #[test]
    fn legacy_groupings_and_aliases_are_skipped() {
        let zone = |id: &str| TimezoneEntry::from_zone(id.parse::<Tz>().unwrap());
        assert!(zone("US/Pacific").is_none());
        assert!(zone("Etc/GMT+5").is_none());
        assert!(zone("Asia/Calcutta").is_none());
        assert!(zone("Asia/Kolkata").is_some());
    }

    #[test]
    fn full_database_has_only_continent_regions() {
        let world = WorldClock::load(&[]);
        for region in world.regions() {
            assert!(CONTINENTS.contains(&region.name.as_str()), "{}", region.name);
        }

        assert!(world.find("Asia/Kolkata").is_some());
        assert!(world.find("Asia/Calcutta").is_none());
        assert!(world.find("Europe/Kyiv").is_some());
        assert!(world.find("Europe/Kiev").is_none());
        assert!(world.find("America/Argentina/Buenos_Aires").is_some());
        assert!(world.find("America/Buenos_Aires").is_none());
    }

    #[test]
    fn region_setting_narrows_the_continent_list() {
        let world = WorldClock::load(&["Europe".to_string(), "US".to_string()]);
        let names: Vec<_> = world.regions().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Europe"]);
    }

    #[test]
    fn display_name_drops_region_and_underscores() {
        let world = sample();
        assert_eq!(world.find("America/New_York").unwrap().display_name, "New York");
        assert_eq!(
            world.find("America/Argentina/Buenos_Aires").unwrap().display_name,
            "Argentina/Buenos Aires"
        );
    }

    #[test]
    fn region_allow_list_limits_the_set() {
        let world = WorldClock::from_zones(
            [Europe::London, Asia::Tokyo, America::New_York],
            &["Asia".to_string()],
        );
        assert_eq!(world.zone_count(), 1);
        assert!(world.find("Asia/Tokyo").is_some());
    }

    #[test]
    fn full_database_loads() {
        let world = WorldClock::load(&[]);
        assert!(world.zone_count() > 300);
        assert!(world.find("Europe/London").is_some());
        for region in world.regions() {
            assert!(region.zones.windows(2).all(|pair| pair[0].id < pair[1].id));
        }
    }

    #[test]
    fn every_zone_renders_the_same_instant() {
        let mut world = sample();
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        world.refresh(instant);

        assert_eq!(world.last_refresh(), Some(instant));
        for entry in world.zones() {
            let expected = (instant + Duration::seconds(entry.utc_offset_secs as i64))
                .format(TIME_OF_DAY_FORMAT)
                .to_string();
            assert_eq!(entry.rendered_time, expected, "{}", entry.id);
        }
        assert_eq!(world.find("Asia/Tokyo").unwrap().rendered_time, "09:00:00 PM");
        assert_eq!(world.find("America/New_York").unwrap().rendered_time, "07:00:00 AM");
    }

    #[test]
    fn dst_changes_only_affected_offsets() {
        let mut world = sample();
        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();

        world.refresh(winter);
        let winter_offsets: Vec<_> = world.zones().map(|z| (z.id.clone(), z.utc_offset_secs)).collect();
        world.refresh(summer);

        let offset = |id: &str| world.find(id).unwrap().utc_offset_secs;
        let winter_offset = |id: &str| {
            winter_offsets
                .iter()
                .find(|(zone, _)| zone == id)
                .map(|(_, secs)| *secs)
                .unwrap()
        };

        assert_eq!(winter_offset("America/New_York"), -5 * 3600);
        assert_eq!(offset("America/New_York"), -4 * 3600);
        assert_eq!(winter_offset("Europe/London"), 0);
        assert_eq!(offset("Europe/London"), 3600);
        assert_eq!(winter_offset("Asia/Tokyo"), offset("Asia/Tokyo"));
        assert_eq!(
            winter_offset("America/Argentina/Buenos_Aires"),
            offset("America/Argentina/Buenos_Aires")
        );
    }

    #[test]
    fn readings_mirror_entries() {
        let mut world = sample();
        world.refresh(Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap());

        let readings = world.readings();
        assert_eq!(readings.len(), world.zone_count());
        let paris = readings.iter().find(|r| r.id == "Europe/Paris").unwrap();
        assert_eq!(paris.time, "02:00:00 AM");
        assert_eq!(paris.utc_offset_secs, 2 * 3600);
    }
}
