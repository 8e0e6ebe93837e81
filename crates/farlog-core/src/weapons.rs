//! Weapon code grouping used when rendering frags

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Broad weapon family, each with its own icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponCategory {
    /// Run over by a vehicle
    Vehicle,
    /// Guns, including vehicle-mounted machine guns
    Firearm,
    /// Grenades and explosives
    Grenade,
    /// Rockets
    Rocket,
    /// Melee weapons
    Melee,
    /// Boats
    Boat,
}

const WEAPON_TABLE: &[(WeaponCategory, &[&str])] = &[
    (WeaponCategory::Vehicle, &["Vehicle"]),
    (
        WeaponCategory::Firearm,
        &[
            "Falcon",
            "Shotgun",
            "P90",
            "MP5",
            "M4",
            "AG36",
            "OICW",
            "SniperRifle",
            "M249",
            "MG",
            "VehicleMountedAutoMG",
            "VehicleMountedMG",
        ],
    ),
    (
        WeaponCategory::Grenade,
        &["HandGrenade", "AG36Grenade", "OICWGrenade", "StickyExplosive"],
    ),
    (
        WeaponCategory::Rocket,
        &["Rocket", "VehicleMountedRocketMG", "VehicleRocket"],
    ),
    (WeaponCategory::Melee, &["Machete"]),
    (WeaponCategory::Boat, &["Boat"]),
];

static WEAPONS: LazyLock<HashMap<&'static str, WeaponCategory>> = LazyLock::new(|| {
    WEAPON_TABLE
        .iter()
        .flat_map(|(category, codes)| codes.iter().map(move |code| (*code, *category)))
        .collect()
});

impl WeaponCategory {
    /// Look up the category of a weapon code; unknown codes yield `None`
    pub fn of(weapon_code: &str) -> Option<WeaponCategory> {
        WEAPONS.get(weapon_code).copied()
    }

    /// Icon shown next to frags made with this kind of weapon
    pub fn icon(&self) -> &'static str {
        match self {
            WeaponCategory::Vehicle => "🚙",
            WeaponCategory::Firearm => "🔫",
            WeaponCategory::Grenade => "💣",
            WeaponCategory::Rocket => "🚀",
            WeaponCategory::Melee => "🔪",
            WeaponCategory::Boat => "🚤",
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponCategory::Vehicle => "vehicle",
            WeaponCategory::Firearm => "firearm",
            WeaponCategory::Grenade => "grenade",
            WeaponCategory::Rocket => "rocket",
            WeaponCategory::Melee => "melee",
            WeaponCategory::Boat => "boat",
        }
    }
}

impl fmt::Display for WeaponCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Icon for a weapon code, `None` when the code is not in the table
pub fn weapon_icon(weapon_code: &str) -> Option<&'static str> {
    WeaponCategory::of(weapon_code).map(|c| c.icon())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_weapons() {
        assert_eq!(WeaponCategory::of("Falcon"), Some(WeaponCategory::Firearm));
        assert_eq!(
            WeaponCategory::of("VehicleMountedRocketMG"),
            Some(WeaponCategory::Rocket)
        );
        assert_eq!(WeaponCategory::of("Machete"), Some(WeaponCategory::Melee));
        assert_eq!(weapon_icon("StickyExplosive"), Some("💣"));
        assert_eq!(weapon_icon("Boat"), Some("🚤"));
    }

    #[test]
    fn test_unknown_weapon_has_no_icon() {
        assert_eq!(WeaponCategory::of("Railgun"), None);
        assert_eq!(weapon_icon(""), None);
        // lookups are case sensitive, like the log
        assert_eq!(weapon_icon("falcon"), None);
    }

    #[test]
    fn test_every_category_has_codes() {
        for category in [
            WeaponCategory::Vehicle,
            WeaponCategory::Firearm,
            WeaponCategory::Grenade,
            WeaponCategory::Rocket,
            WeaponCategory::Melee,
            WeaponCategory::Boat,
        ] {
            assert!(
                WEAPON_TABLE.iter().any(|(c, codes)| *c == category && !codes.is_empty()),
                "{} has no weapon codes",
                category
            );
        }
    }
}
