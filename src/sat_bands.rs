use serde::Deserialize;
use std::fmt::Display;

/// Name of the pre-computed chlorophyll-a band in Level-3 products.
pub const CHLOR_A: &str = "chlor_a";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum Satellites {
    #[serde(rename(deserialize = "seawifs"))]
    SeaWiFS,
    #[serde(rename(deserialize = "modis"))]
    Modis,
}

impl Satellites {
    /// Mission prefix of OB.DAAC granule names.
    pub fn mission(&self) -> &'static str {
        match self {
            Satellites::SeaWiFS => "SEASTAR_SEAWIFS_GAC",
            Satellites::Modis => "AQUA_MODIS",
        }
    }

    /// Leading letter of collection image ids (`A2017183`).
    pub fn id_prefix(&self) -> char {
        match self {
            Satellites::SeaWiFS => 'S',
            Satellites::Modis => 'A',
        }
    }

    pub fn from_mission(mission: &str) -> Option<Self> {
        match mission {
            "SEASTAR_SEAWIFS_GAC" | "SEASTAR_SEAWIFS_MLAC" => Some(Satellites::SeaWiFS),
            "AQUA_MODIS" => Some(Satellites::Modis),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct SatBands {
    sensor: Satellites,
    wavelengths: &'static [u32],
}

impl SatBands {
    pub fn new(sensor: Satellites) -> Self {
        let wavelengths: &'static [u32] = match sensor {
            // Bands 1, 2, 3, 4, 5 and 6
            Satellites::SeaWiFS => &[412, 443, 490, 510, 555, 670],
            // Bands 8, 9, 10, 11, 12 and 13
            Satellites::Modis => &[412, 443, 488, 531, 547, 667],
        };
        Self {
            sensor,
            wavelengths,
        }
    }

    pub fn sensor(&self) -> Satellites {
        self.sensor
    }

    pub fn wavelengths(&self) -> &[u32] {
        self.wavelengths
    }

    pub fn closest_band(&self, target: u32) -> u32 {
        self.wavelengths
            .iter()
            .copied()
            .min_by_key(|w| (*w as i32 - target as i32).abs())
            .unwrap_or(target)
    }

    /// Remote sensing reflectance band closest to `target` nm, e.g. `Rrs_488`.
    pub fn rrs_band(&self, target: u32) -> String {
        format!("Rrs_{}", self.closest_band(target))
    }
}

impl Display for Satellites {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Satellites::SeaWiFS => write!(f, "SeaWiFS"),
            Satellites::Modis => write!(f, "MODIS"),
        }
    }
}

impl Display for SatBands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Satellite: {}, Wavelengths: {:?}",
            self.sensor, self.wavelengths
        )
    }
}
