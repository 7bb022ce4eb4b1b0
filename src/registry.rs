// 🗂️ Address Registry - Cities, streets and address points in memory
//
// Append-only: ingestion adds rows, the line pipeline only reads.
// Reads and writes go through one RwLock, so a shared registry can be
// queried from many threads while a loader is still filling it.

use crate::model::{City, GeoPoint, Street};
use crate::slug::slugify;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// ============================================================================
// REGISTRY TRAIT
// ============================================================================

/// Read-only view the line pipeline needs
pub trait Registry: Send + Sync {
    fn city(&self, city_code: u32) -> Option<City>;

    /// Streets of a city ordered by code, `None` for an unknown city
    fn streets_in_city(&self, city_code: u32) -> Option<Vec<Street>>;

    /// First street of a city (by code) accepted by `accept`, matched in place
    fn find_street(&self, city_code: u32, accept: &dyn Fn(&Street) -> bool) -> Option<Street>;

    fn data_points_for_street(&self, street_code: u32) -> Vec<GeoPoint>;

    /// Cities whose slug starts with the slug of `prefix`, ordered by name
    fn autocomplete_city(&self, prefix: &str) -> Vec<City>;

    /// Streets of a city whose slug starts with the slug of `prefix`, ordered by name
    fn autocomplete_street(&self, city_code: u32, prefix: &str) -> Vec<Street>;
}

// ============================================================================
// IN-MEMORY REGISTRY
// ============================================================================

#[derive(Debug, Default)]
struct RegistryData {
    cities: HashMap<u32, City>,
    streets: HashMap<u32, BTreeMap<u32, Street>>,
    /// street code → address code → point
    points: HashMap<u32, BTreeMap<u64, GeoPoint>>,
}

#[derive(Debug, Clone, Default)]
pub struct AddressRegistry {
    data: Arc<RwLock<RegistryData>>,
}

impl AddressRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a city; an existing city with the same code is kept
    pub fn insert_city(&self, code: u32, name: &str) -> bool {
        let mut data = self.write();
        if data.cities.contains_key(&code) {
            return false;
        }
        data.cities.insert(
            code,
            City {
                code,
                name: name.to_string(),
                slug: slugify(name),
            },
        );
        true
    }

    /// Register a street of a city. The latest name wins; returns true
    /// when the street code was new for that city.
    pub fn insert_street(&self, city_code: u32, code: u32, name: &str) -> bool {
        let street = Street {
            code,
            name: name.to_string(),
            slug: slugify(name),
        };
        self.write()
            .streets
            .entry(city_code)
            .or_default()
            .insert(code, street)
            .is_none()
    }

    /// Store an address point; a point with the same address code is replaced
    pub fn insert_point(&self, street_code: u32, address_code: u64, point: GeoPoint) {
        self.write()
            .points
            .entry(street_code)
            .or_default()
            .insert(address_code, point);
    }

    pub fn city_count(&self) -> usize {
        self.read().cities.len()
    }

    pub fn street_count(&self) -> usize {
        self.read().streets.values().map(BTreeMap::len).sum()
    }

    pub fn point_count(&self) -> usize {
        self.read().points.values().map(BTreeMap::len).sum()
    }
}

impl Registry for AddressRegistry {
    fn city(&self, city_code: u32) -> Option<City> {
        self.read().cities.get(&city_code).cloned()
    }

    fn streets_in_city(&self, city_code: u32) -> Option<Vec<Street>> {
        self.read()
            .streets
            .get(&city_code)
            .map(|streets| streets.values().cloned().collect())
    }

    fn find_street(&self, city_code: u32, accept: &dyn Fn(&Street) -> bool) -> Option<Street> {
        self.read()
            .streets
            .get(&city_code)?
            .values()
            .find(|street| accept(street))
            .cloned()
    }

    fn data_points_for_street(&self, street_code: u32) -> Vec<GeoPoint> {
        self.read()
            .points
            .get(&street_code)
            .map(|points| points.values().cloned().collect())
            .unwrap_or_default()
    }

    fn autocomplete_city(&self, prefix: &str) -> Vec<City> {
        let slug = slugify(prefix);
        let mut cities: Vec<City> = self
            .read()
            .cities
            .values()
            .filter(|c| c.slug.starts_with(&slug))
            .cloned()
            .collect();
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        cities
    }

    fn autocomplete_street(&self, city_code: u32, prefix: &str) -> Vec<Street> {
        let slug = slugify(prefix);
        let mut streets: Vec<Street> = self
            .read()
            .streets
            .get(&city_code)
            .map(|streets| {
                streets
                    .values()
                    .filter(|s| s.slug.starts_with(&slug))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        streets.sort_by(|a, b| a.name.cmp(&b.name));
        streets
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn point(address: &str) -> GeoPoint {
        GeoPoint {
            address: address.to_string(),
            lat: 50.09,
            lng: 14.40,
            orientation_number: 0,
            descriptive_number: 0,
        }
    }

    fn sample() -> AddressRegistry {
        let registry = AddressRegistry::new();
        registry.insert_city(554782, "Praha");
        registry.insert_city(500001, "Prachatice");
        registry.insert_city(500002, "Brno");
        registry.insert_street(554782, 10, "Rašínovo nábřeží");
        registry.insert_street(554782, 11, "Palackého");
        registry.insert_street(554782, 12, "Pařížská");
        registry.insert_street(500002, 20, "Palackého třída");
        registry
    }

    #[test]
    fn test_insert_city_keeps_first() {
        let registry = sample();
        assert!(!registry.insert_city(554782, "Prague"));
        assert_eq!(registry.city(554782).unwrap().name, "Praha");
        assert_eq!(registry.city(554782).unwrap().slug, "praha");
        assert_eq!(registry.city_count(), 3);
    }

    #[test]
    fn test_insert_street_last_name_wins() {
        let registry = sample();
        assert!(!registry.insert_street(554782, 11, "Palackého nábřeží"));
        assert!(registry.insert_street(554782, 13, "Vodičkova"));

        let streets = registry.streets_in_city(554782).unwrap();
        let codes: Vec<u32> = streets.iter().map(|s| s.code).collect();
        assert_eq!(codes, vec![10, 11, 12, 13]);
        assert_eq!(streets[1].name, "Palackého nábřeží");
        assert_eq!(registry.street_count(), 5);
    }

    #[test]
    fn test_find_street_in_code_order() {
        let registry = sample();
        registry.insert_street(500002, 5, "Karlova");

        let found = registry.find_street(500002, &|s| s.slug.starts_with('k'));
        assert_eq!(found.map(|s| s.code), Some(5));
        assert_eq!(registry.find_street(500002, &|s| s.name == "Nowhere"), None);
        assert_eq!(registry.find_street(1, &|_| true), None);
    }

    #[test]
    fn test_unknown_city_has_no_streets() {
        assert_eq!(sample().streets_in_city(1), None);
    }

    #[test]
    fn test_points_keyed_by_address_code() {
        let registry = sample();
        registry.insert_point(10, 1, point("Rašínovo nábřeží 1"));
        registry.insert_point(10, 2, point("Rašínovo nábřeží 2"));
        registry.insert_point(10, 1, point("Rašínovo nábřeží 1/100"));

        let points = registry.data_points_for_street(10);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].address, "Rašínovo nábřeží 1/100");
        assert!(registry.data_points_for_street(99).is_empty());
        assert_eq!(registry.point_count(), 2);
    }

    #[test]
    fn test_autocomplete_city_by_slug_prefix() {
        let registry = sample();
        let names: Vec<String> = registry
            .autocomplete_city("PRA")
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Prachatice", "Praha"]);
        assert!(registry.autocomplete_city("Ostrava").is_empty());
    }

    #[test]
    fn test_autocomplete_street_folds_diacritics() {
        let registry = sample();
        let names: Vec<String> = registry
            .autocomplete_street(554782, "pa")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Palackého", "Pařížská"]);

        let names: Vec<String> = registry
            .autocomplete_street(554782, "Raši")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Rašínovo nábřeží"]);
        assert!(registry.autocomplete_street(1, "pa").is_empty());
    }

    #[test]
    fn test_clones_share_data() {
        let registry = sample();
        let shared = registry.clone();
        shared.insert_street(500002, 21, "Česká");
        assert_eq!(registry.streets_in_city(500002).unwrap().len(), 2);
    }
}
