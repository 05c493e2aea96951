// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record classification into category tabs
//!
//! Classification is an ordered rule list evaluated top-down; the first rule
//! whose predicate holds decides the category, otherwise the fallback does.
//! Narrow exact-match rules sit above the broad substring rules that share
//! their lexical roots.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{UnknownCategoryError, UnknownClassifierError};
use crate::schema::{Column, Record};
use crate::text::{normalize, strip_whitespace};

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]").expect("valid regex"));

/// Category tab a record belongs to
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Category {
    /// Default tab: passenger cars
    #[default]
    #[serde(rename = "auta")]
    Car,
    /// Buses and freight vehicles
    #[serde(rename = "bus")]
    Bus,
    #[serde(rename = "moto")]
    Motorcycle,
    /// Windshield and glass services
    #[serde(rename = "skla")]
    Glass,
    /// Paintless dent repair
    #[serde(rename = "pdr")]
    Pdr,
}

impl Category {
    /// Tab order
    pub const ALL: [Category; 5] = [
        Category::Car,
        Category::Bus,
        Category::Motorcycle,
        Category::Glass,
        Category::Pdr,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Category::Car => "auta",
            Category::Bus => "bus",
            Category::Motorcycle => "moto",
            Category::Glass => "skla",
            Category::Pdr => "pdr",
        }
    }

    /// Tab caption
    pub fn label(self) -> &'static str {
        match self {
            Category::Car => "Auta",
            Category::Bus => "Bus",
            Category::Motorcycle => "Moto",
            Category::Glass => "Skla",
            Category::Pdr => "PDR",
        }
    }

    /// Resolve a tab selector; unset or unknown selectors pick the default tab.
    pub fn from_selector(selector: Option<&str>) -> Category {
        selector
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Category {
    type Err = UnknownCategoryError;

    /// Accepts the tab tags and their English names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s.trim()).as_str() {
            "auta" | "auto" | "car" | "cars" => Ok(Category::Car),
            "bus" | "nakladni" | "truck" => Ok(Category::Bus),
            "moto" | "motorcycle" => Ok(Category::Motorcycle),
            "skla" | "sklo" | "glass" => Ok(Category::Glass),
            "pdr" => Ok(Category::Pdr),
            _ => Err(UnknownCategoryError {
                selector: s.to_string(),
                known: Category::ALL.iter().map(|c| c.tag().to_string()).collect(),
            }),
        }
    }
}

/// Which rule set to classify with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// Five tabs driven by the service-type column
    #[default]
    Detailed,
    /// Three tabs (auta, bus, skla) from substring tests
    Simple,
}

impl FromStr for ClassifierKind {
    type Err = UnknownClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "detailed" => Ok(ClassifierKind::Detailed),
            "simple" => Ok(ClassifierKind::Simple),
            _ => Err(UnknownClassifierError {
                name: s.to_string(),
            }),
        }
    }
}

/// Comparison keys derived once per record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Features {
    /// Service type, folded
    pub service_type: String,
    /// Service type, lowercased only, whitespace removed
    pub service_type_compact: String,
    /// Service type, folded, whitespace removed
    pub service_type_key: String,
    /// Service type, folded, only `[a-z0-9]` kept
    pub service_type_alnum: String,
    /// Brands column, folded
    pub brands: String,
    /// Service name, folded
    pub name: String,
}

impl Features {
    pub fn new(service_type: &str, brands: &str, name: &str) -> Self {
        let folded = normalize(service_type);
        Self {
            service_type_compact: strip_whitespace(&service_type.to_lowercase()),
            service_type_key: strip_whitespace(&folded),
            service_type_alnum: NON_ALNUM.replace_all(&folded, "").into_owned(),
            service_type: folded,
            brands: normalize(brands),
            name: normalize(name),
        }
    }

    pub fn from_record(record: &Record) -> Self {
        Self::new(
            record.get(Column::ServiceType),
            record.get(Column::Brands),
            record.get(Column::ServiceName),
        )
    }
}

/// One classification rule
#[derive(Clone, Copy)]
pub struct Rule {
    pub priority: u8,
    pub name: &'static str,
    pub category: Category,
    predicate: fn(&Features) -> bool,
}

impl Rule {
    pub const fn new(
        priority: u8,
        name: &'static str,
        category: Category,
        predicate: fn(&Features) -> bool,
    ) -> Self {
        Self {
            priority,
            name,
            category,
            predicate,
        }
    }

    pub fn matches(&self, features: &Features) -> bool {
        (self.predicate)(features)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("priority", &self.priority)
            .field("name", &self.name)
            .field("category", &self.category)
            .finish()
    }
}

const GLASS_TYPES: [&str; 2] = ["autosklodirect", "mobilniautosklodirect"];

const MOTO_TYPE_FRAGMENTS: [&str; 3] = [
    "autorizovanyservisdirectmotocykly",
    "autorizovanyservisdirectmoto",
    "autorizovanyservismotocykly",
];

// compared with diacritics intact, as stored in the export
const BUS_TYPES: [&str; 2] = ["autorizovanýnákladníservisdirect", "neautorizovanýnákladníservis"];

fn is_pdr(f: &Features) -> bool {
    f.service_type.contains("pdr")
}

fn is_glass_type(f: &Features) -> bool {
    GLASS_TYPES.contains(&f.service_type_key.as_str())
}

fn is_moto_type(f: &Features) -> bool {
    MOTO_TYPE_FRAGMENTS
        .iter()
        .any(|fragment| f.service_type_alnum.contains(fragment))
}

fn is_bus_type(f: &Features) -> bool {
    BUS_TYPES.contains(&f.service_type_compact.as_str())
}

fn mentions_glass(f: &Features) -> bool {
    f.service_type.contains("autosklo") || f.name.contains("autosklo")
}

fn mentions_freight(f: &Features) -> bool {
    ["nakladni", "autobus"]
        .iter()
        .any(|word| f.service_type.contains(word) || f.brands.contains(word))
}

const DETAILED_RULES: [Rule; 4] = [
    Rule::new(1, "pdr-process", Category::Pdr, is_pdr),
    Rule::new(2, "glass-exact-type", Category::Glass, is_glass_type),
    Rule::new(3, "moto-type-contains", Category::Motorcycle, is_moto_type),
    Rule::new(4, "bus-exact-type", Category::Bus, is_bus_type),
];

const SIMPLE_RULES: [Rule; 2] = [
    Rule::new(1, "glass-mention", Category::Glass, mentions_glass),
    Rule::new(2, "freight-mention", Category::Bus, mentions_freight),
];

/// Ordered rule list with a fallback category
#[derive(Debug, Clone)]
pub struct Classifier {
    kind: ClassifierKind,
    rules: Vec<Rule>,
    fallback: Category,
}

impl Classifier {
    /// Build from rules in any order; they are evaluated by ascending priority.
    pub fn from_rules(kind: ClassifierKind, mut rules: Vec<Rule>, fallback: Category) -> Self {
        rules.sort_by_key(|r| r.priority);
        Self {
            kind,
            rules,
            fallback,
        }
    }

    pub fn detailed() -> Self {
        Self::from_rules(ClassifierKind::Detailed, DETAILED_RULES.to_vec(), Category::Car)
    }

    pub fn simple() -> Self {
        Self::from_rules(ClassifierKind::Simple, SIMPLE_RULES.to_vec(), Category::Car)
    }

    pub fn for_kind(kind: ClassifierKind) -> Self {
        match kind {
            ClassifierKind::Detailed => Self::detailed(),
            ClassifierKind::Simple => Self::simple(),
        }
    }

    pub fn kind(&self) -> ClassifierKind {
        self.kind
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallback(&self) -> Category {
        self.fallback
    }

    /// Categories this classifier can produce, in tab order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| *c == self.fallback || self.rules.iter().any(|r| r.category == *c))
            .collect()
    }

    /// First matching rule, `None` when the fallback applies.
    pub fn matching_rule(&self, features: &Features) -> Option<&Rule> {
        self.rules.iter().find(|r| r.matches(features))
    }

    pub fn classify_features(&self, features: &Features) -> Category {
        self.matching_rule(features)
            .map(|r| r.category)
            .unwrap_or(self.fallback)
    }

    pub fn classify(&self, record: &Record) -> Category {
        self.classify_features(&Features::from_record(record))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::detailed()
    }
}
