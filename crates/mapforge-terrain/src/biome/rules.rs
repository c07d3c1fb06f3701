//! Ordered classification rules mapping height and biome flags to a
//! [`Classification`].
//!
//! Rules are evaluated top to bottom and every matching rule overwrites the
//! result, so the last matching rule wins. Precedence is therefore the order
//! of the table, not the shape of the code.

use serde::{Deserialize, Serialize};

use super::def::{BiomeTag, Classification, TerrainType};
use super::sampler::{BiomeFlag, BiomeFlags};
use crate::error::TerrainError;

/// Height thresholds shared by the classifier rules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Heights strictly below this are sea.
    pub sea_level: f64,
    /// Land within this distance above sea level is beach.
    pub sand_reach: f64,
    /// Heights at or above this are stone.
    pub stone_level: f64,
    /// Heights at or above this are snow.
    pub snow_level: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            sea_level: 0.0,
            sand_reach: 0.05,
            stone_level: 0.4,
            snow_level: 0.6,
        }
    }
}

impl Thresholds {
    /// Upper (exclusive) bound of the beach band.
    pub fn beach_limit(&self) -> f64 {
        self.sea_level + self.sand_reach
    }

    /// Require `sea_level < beach_limit < stone_level < snow_level`.
    ///
    /// Comparisons are written so that a NaN anywhere fails validation.
    pub fn validate(&self) -> Result<(), TerrainError> {
        let ordered = self.sea_level < self.beach_limit()
            && self.beach_limit() < self.stone_level
            && self.stone_level < self.snow_level
            && self.snow_level.is_finite()
            && self.sea_level.is_finite();
        if ordered {
            Ok(())
        } else {
            Err(TerrainError::ThresholdOrder {
                sea_level: self.sea_level,
                beach_limit: self.beach_limit(),
                stone_level: self.stone_level,
                snow_level: self.snow_level,
            })
        }
    }
}

/// Height level referenced by an [`RuleCondition::AtOrAbove`] rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Stone,
    Snow,
}

/// Predicate half of a classification rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCondition {
    /// `height < sea_level`.
    BelowSeaLevel,
    /// Below sea level with the given flag set.
    SeaWithFlag(BiomeFlag),
    /// `height >= sea_level`.
    Land,
    /// Land with the given flag set.
    LandWithFlag(BiomeFlag),
    /// Land with `height - sea_level < sand_reach`.
    Shore,
    /// `height >= level`.
    AtOrAbove(Level),
}

impl RuleCondition {
    pub fn matches(self, height: f64, flags: BiomeFlags, thresholds: &Thresholds) -> bool {
        let land = height >= thresholds.sea_level;
        match self {
            Self::BelowSeaLevel => !land,
            Self::SeaWithFlag(flag) => !land && flags.get(flag),
            Self::Land => land,
            Self::LandWithFlag(flag) => land && flags.get(flag),
            Self::Shore => land && height - thresholds.sea_level < thresholds.sand_reach,
            Self::AtOrAbove(Level::Stone) => height >= thresholds.stone_level,
            Self::AtOrAbove(Level::Snow) => height >= thresholds.snow_level,
        }
    }
}

/// One `(condition, terrain, biome)` row. A `None` biome keeps whatever an
/// earlier rule assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassificationRule {
    pub condition: RuleCondition,
    pub terrain: TerrainType,
    pub biome: Option<BiomeTag>,
}

impl ClassificationRule {
    const fn new(condition: RuleCondition, terrain: TerrainType, biome: Option<BiomeTag>) -> Self {
        Self {
            condition,
            terrain,
            biome,
        }
    }
}

/// An ordered list of rules, lowest precedence first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<ClassificationRule>,
}

impl RuleTable {
    /// Build a table from explicit rules.
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    /// The standard precedence order. `land_biome` tags plain land:
    /// `Grassland` when auxiliary flags are in play, `Plains` otherwise.
    pub fn standard(land_biome: BiomeTag) -> Self {
        use BiomeTag as B;
        use RuleCondition as C;
        use TerrainType as T;

        Self::new(vec![
            ClassificationRule::new(C::BelowSeaLevel, T::Water, Some(B::Sea)),
            ClassificationRule::new(C::SeaWithFlag(BiomeFlag::Snow), T::Ice, Some(B::FrozenSea)),
            ClassificationRule::new(C::Land, T::Grass, Some(land_biome)),
            ClassificationRule::new(
                C::LandWithFlag(BiomeFlag::Savanna),
                T::Grass,
                Some(B::Savanna),
            ),
            ClassificationRule::new(C::LandWithFlag(BiomeFlag::Forest), T::Grass, Some(B::Forest)),
            ClassificationRule::new(C::Shore, T::Sand, Some(B::Beach)),
            ClassificationRule::new(C::LandWithFlag(BiomeFlag::Snow), T::Snow, Some(B::Frozen)),
            ClassificationRule::new(C::LandWithFlag(BiomeFlag::Desert), T::Sand, Some(B::Desert)),
            ClassificationRule::new(C::AtOrAbove(Level::Stone), T::Stone, None),
            ClassificationRule::new(C::AtOrAbove(Level::Snow), T::Snow, None),
        ])
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Apply every matching rule in order, starting from open sea.
    pub fn classify(&self, height: f64, flags: BiomeFlags, thresholds: &Thresholds) -> Classification {
        self.rules
            .iter()
            .filter(|rule| rule.condition.matches(height, flags, thresholds))
            .fold(Classification::default(), |acc, rule| Classification {
                terrain: rule.terrain,
                biome: rule.biome.unwrap_or(acc.biome),
            })
    }
}

/// Pure classifier: thresholds plus a rule table.
#[derive(Clone, Debug)]
pub struct BiomeClassifier {
    thresholds: Thresholds,
    table: RuleTable,
}

impl BiomeClassifier {
    /// Validates the thresholds before accepting them.
    pub fn new(thresholds: Thresholds, table: RuleTable) -> Result<Self, TerrainError> {
        thresholds.validate()?;
        Ok(Self { thresholds, table })
    }

    pub fn classify(&self, height: f64, flags: BiomeFlags) -> Classification {
        self.table.classify(height, flags, &self.thresholds)
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multi_biome() -> BiomeClassifier {
        BiomeClassifier::new(Thresholds::default(), RuleTable::standard(BiomeTag::Grassland))
            .unwrap()
    }

    fn five_band() -> BiomeClassifier {
        let thresholds = Thresholds {
            sea_level: 0.0,
            sand_reach: 0.04,
            stone_level: 0.35,
            snow_level: 0.45,
        };
        BiomeClassifier::new(thresholds, RuleTable::standard(BiomeTag::Plains)).unwrap()
    }

    fn class(terrain: TerrainType, biome: BiomeTag) -> Classification {
        Classification { terrain, biome }
    }

    #[test]
    fn test_five_band_heights() {
        let c = five_band();
        let none = BiomeFlags::default();
        assert_eq!(c.classify(-0.5, none), class(TerrainType::Water, BiomeTag::Sea));
        assert_eq!(c.classify(0.0, none), class(TerrainType::Sand, BiomeTag::Beach));
        assert_eq!(c.classify(0.039, none), class(TerrainType::Sand, BiomeTag::Beach));
        assert_eq!(c.classify(0.2, none), class(TerrainType::Grass, BiomeTag::Plains));
        assert_eq!(c.classify(0.35, none), class(TerrainType::Stone, BiomeTag::Plains));
        assert_eq!(c.classify(0.9, none), class(TerrainType::Snow, BiomeTag::Plains));
    }

    #[test]
    fn test_snow_level_is_inclusive() {
        let c = multi_biome();
        let snow = c.thresholds().snow_level;
        assert_eq!(c.classify(snow, BiomeFlags::default()).terrain, TerrainType::Snow);
        assert_eq!(
            c.classify(snow - 1e-9, BiomeFlags::default()).terrain,
            TerrainType::Stone
        );
    }

    #[test]
    fn test_snow_by_height_beats_every_flag() {
        let c = multi_biome();
        let all = BiomeFlags {
            desert: true,
            snow: true,
            savanna: true,
            forest: true,
        };
        let result = c.classify(0.8, all);
        assert_eq!(result.terrain, TerrainType::Snow);
        // Biome stays with the last biome-setting rule (desert).
        assert_eq!(result.biome, BiomeTag::Desert);
    }

    #[test]
    fn test_stone_beats_desert_paint() {
        let c = multi_biome();
        let flags = BiomeFlags::default().with(BiomeFlag::Desert);
        assert_eq!(
            c.classify(0.45, flags),
            class(TerrainType::Stone, BiomeTag::Desert)
        );
    }

    #[test]
    fn test_snow_flag_freezes_sea() {
        let c = multi_biome();
        let flags = BiomeFlags::default().with(BiomeFlag::Snow);
        assert_eq!(c.classify(-0.3, flags), class(TerrainType::Ice, BiomeTag::FrozenSea));
        assert_eq!(c.classify(0.2, flags), class(TerrainType::Snow, BiomeTag::Frozen));
    }

    #[test]
    fn test_land_flag_precedence() {
        let c = multi_biome();
        let savanna = BiomeFlags::default().with(BiomeFlag::Savanna);
        let both = savanna.with(BiomeFlag::Forest);
        assert_eq!(c.classify(0.2, savanna), class(TerrainType::Grass, BiomeTag::Savanna));
        assert_eq!(c.classify(0.2, both), class(TerrainType::Grass, BiomeTag::Forest));
        // Beach overrides forest near the water line.
        assert_eq!(c.classify(0.01, both), class(TerrainType::Sand, BiomeTag::Beach));
    }

    #[test]
    fn test_land_flags_ignored_below_sea() {
        let c = multi_biome();
        let flags = BiomeFlags::default()
            .with(BiomeFlag::Desert)
            .with(BiomeFlag::Savanna)
            .with(BiomeFlag::Forest);
        assert_eq!(c.classify(-0.01, flags), class(TerrainType::Water, BiomeTag::Sea));
    }

    #[test]
    fn test_below_sea_is_always_water_or_ice() {
        let c = multi_biome();
        for i in 0..=100 {
            let h = -1.0 + i as f64 * 0.0099;
            for flags in [
                BiomeFlags::default(),
                BiomeFlags::default().with(BiomeFlag::Snow),
                BiomeFlags::default().with(BiomeFlag::Desert).with(BiomeFlag::Forest),
            ] {
                assert!(c.classify(h, flags).terrain.is_liquid_surface());
            }
        }
    }

    #[test]
    fn test_threshold_order_rejected() {
        let inverted = Thresholds {
            stone_level: 0.7,
            snow_level: 0.6,
            ..Thresholds::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(TerrainError::ThresholdOrder { .. })
        ));

        let beach_swallows_stone = Thresholds {
            sand_reach: 0.5,
            ..Thresholds::default()
        };
        assert!(beach_swallows_stone.validate().is_err());

        let no_beach = Thresholds {
            sand_reach: 0.0,
            ..Thresholds::default()
        };
        assert!(no_beach.validate().is_err());

        let nan = Thresholds {
            sea_level: f64::NAN,
            ..Thresholds::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_standard_table_order() {
        let table = RuleTable::standard(BiomeTag::Grassland);
        let rules = table.rules();
        assert_eq!(rules.len(), 10);
        assert_eq!(rules[0].condition, RuleCondition::BelowSeaLevel);
        assert_eq!(
            rules.last().map(|r| r.condition),
            Some(RuleCondition::AtOrAbove(Level::Snow))
        );
    }

    #[test]
    fn test_custom_table() {
        let table = RuleTable::new(vec![ClassificationRule::new(
            RuleCondition::Land,
            TerrainType::Stone,
            None,
        )]);
        let c = BiomeClassifier::new(Thresholds::default(), table).unwrap();
        assert_eq!(c.classify(-0.5, BiomeFlags::default()), Classification::default());
        assert_eq!(
            c.classify(0.5, BiomeFlags::default()),
            class(TerrainType::Stone, BiomeTag::Sea)
        );
    }
}
