//! The fixed technology catalog.
//!
//! Ten technologies, built once on first use. Identifiers are derived from
//! each technology's slug so they are identical across processes and
//! restarts.

use std::sync::LazyLock;

use hexrealm_core::ids::{TechnologyId, derived_id};
use hexrealm_core::unit_type::UnitType;
use serde::Serialize;
use uuid::Uuid;

/// Namespace under which technology slugs are hashed into identifiers.
const TECHNOLOGY_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_93d7_4b0a_8e55_1d2c_7a90_b3e4);

/// What a bonus improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BonusType {
    Food,
    Production,
    Science,
    Attack,
    Defense,
    Movement,
}

/// What a bonus applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BonusTarget {
    City,
    Units,
}

/// Effect granted once a technology is discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TechnologyEffect {
    /// A flat bonus.
    Bonus {
        bonus_type: BonusType,
        bonus_value: u32,
        target: BonusTarget,
    },
    /// Makes a unit type available.
    UnlockUnit { unit_type: UnitType },
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Technology {
    /// Stable identifier derived from `slug`.
    pub id: TechnologyId,
    /// Short machine name, e.g. `"iron_working"`.
    pub slug: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Science points spent on discovery.
    pub cost: u32,
    /// Technologies that must be discovered first.
    pub prerequisites: Vec<TechnologyId>,
    /// Effects granted on discovery.
    pub effects: Vec<TechnologyEffect>,
}

impl Technology {
    /// Returns `true` if the technology has no prerequisites.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.prerequisites.is_empty()
    }
}

/// Identifier of the catalog technology with the given slug.
#[must_use]
pub fn technology_id(slug: &str) -> TechnologyId {
    TechnologyId::from_uuid(derived_id(TECHNOLOGY_NAMESPACE, slug))
}

struct Entry {
    slug: &'static str,
    name: &'static str,
    description: &'static str,
    cost: u32,
    prerequisites: &'static [&'static str],
    effects: &'static [TechnologyEffect],
}

const fn bonus(bonus_type: BonusType, bonus_value: u32, target: BonusTarget) -> TechnologyEffect {
    TechnologyEffect::Bonus {
        bonus_type,
        bonus_value,
        target,
    }
}

const ENTRIES: [Entry; 10] = [
    Entry {
        slug: "agriculture",
        name: "Agriculture",
        description: "Cultivation of crops feeds growing cities.",
        cost: 10,
        prerequisites: &[],
        effects: &[bonus(BonusType::Food, 1, BonusTarget::City)],
    },
    Entry {
        slug: "mining",
        name: "Mining",
        description: "Extraction of stone and ore from the earth.",
        cost: 15,
        prerequisites: &[],
        effects: &[bonus(BonusType::Production, 1, BonusTarget::City)],
    },
    Entry {
        slug: "writing",
        name: "Writing",
        description: "Recorded knowledge accelerates research.",
        cost: 20,
        prerequisites: &["agriculture"],
        effects: &[bonus(BonusType::Science, 1, BonusTarget::City)],
    },
    Entry {
        slug: "iron_working",
        name: "Iron Working",
        description: "Iron tools and weapons.",
        cost: 30,
        prerequisites: &["mining"],
        effects: &[bonus(BonusType::Attack, 2, BonusTarget::Units)],
    },
    Entry {
        slug: "mathematics",
        name: "Mathematics",
        description: "Calculation and measurement.",
        cost: 25,
        prerequisites: &["writing"],
        effects: &[bonus(BonusType::Science, 2, BonusTarget::City)],
    },
    Entry {
        slug: "architecture",
        name: "Architecture",
        description: "Sturdy walls and lasting buildings.",
        cost: 35,
        prerequisites: &["mathematics"],
        effects: &[bonus(BonusType::Defense, 2, BonusTarget::City)],
    },
    Entry {
        slug: "military_tactics",
        name: "Military Tactics",
        description: "Organized formations of ranged and mounted troops.",
        cost: 40,
        prerequisites: &["iron_working"],
        effects: &[
            TechnologyEffect::UnlockUnit {
                unit_type: UnitType::Archer,
            },
            TechnologyEffect::UnlockUnit {
                unit_type: UnitType::Cavalry,
            },
        ],
    },
    Entry {
        slug: "navigation",
        name: "Navigation",
        description: "Charts and stars guide travel.",
        cost: 30,
        prerequisites: &["writing"],
        effects: &[bonus(BonusType::Movement, 1, BonusTarget::Units)],
    },
    Entry {
        slug: "philosophy",
        name: "Philosophy",
        description: "Schools of thought attract scholars.",
        cost: 45,
        prerequisites: &["writing", "mathematics"],
        effects: &[bonus(BonusType::Science, 3, BonusTarget::City)],
    },
    Entry {
        slug: "engineering",
        name: "Engineering",
        description: "Machines of war and peace.",
        cost: 50,
        prerequisites: &["mathematics", "iron_working"],
        effects: &[TechnologyEffect::UnlockUnit {
            unit_type: UnitType::SiegeEngine,
        }],
    },
];

static CATALOG: LazyLock<Vec<Technology>> = LazyLock::new(|| {
    ENTRIES
        .iter()
        .map(|entry| Technology {
            id: technology_id(entry.slug),
            slug: entry.slug,
            name: entry.name,
            description: entry.description,
            cost: entry.cost,
            prerequisites: entry.prerequisites.iter().map(|s| technology_id(s)).collect(),
            effects: entry.effects.to_vec(),
        })
        .collect()
});

/// Every technology, in catalog order.
#[must_use]
pub fn all_technologies() -> &'static [Technology] {
    &CATALOG
}

/// Looks up a technology by id.
#[must_use]
pub fn find_technology(id: TechnologyId) -> Option<&'static Technology> {
    CATALOG.iter().find(|t| t.id == id)
}
