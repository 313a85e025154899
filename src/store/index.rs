//! Composite index registry and power-set provisioning.
//!
//! The underlying store serves a filtered+sorted query only when a
//! composite index was declared for that exact combination of equality
//! fields and sort field. The operational mitigation is to provision the
//! full power set of filterable fields crossed with every sortable field
//! at store open, so every legal filter combination is always indexable.

use ahash::AHashSet;

use super::Predicate;
use crate::model::SortField;

/// A filterable resource field, one bit each for combination masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterField {
    Branch,
    Regulation,
    Subject,
    Unit,
    DocumentType,
    FileType,
    Year,
    Semester,
}

impl FilterField {
    pub const ALL: [FilterField; 8] = [
        Self::Branch,
        Self::Regulation,
        Self::Subject,
        Self::Unit,
        Self::DocumentType,
        Self::FileType,
        Self::Year,
        Self::Semester,
    ];

    pub(crate) fn bit(self) -> u16 {
        match self {
            Self::Branch => 1 << 0,
            Self::Regulation => 1 << 1,
            Self::Subject => 1 << 2,
            Self::Unit => 1 << 3,
            Self::DocumentType => 1 << 4,
            Self::FileType => 1 << 5,
            Self::Year => 1 << 6,
            Self::Semester => 1 << 7,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::Regulation => "regulation",
            Self::Subject => "subject",
            Self::Unit => "unit",
            Self::DocumentType => "document_type",
            Self::FileType => "file_type",
            Self::Year => "year",
            Self::Semester => "semester",
        }
    }
}

/// The combination mask of a predicate list. Duplicate fields collapse
/// into one bit, matching how a composite index treats them.
pub(crate) fn mask_of(predicates: &[Predicate]) -> u16 {
    predicates
        .iter()
        .fold(0u16, |mask, p| mask | p.field().bit())
}

/// The set of declared composite indexes.
///
/// Declarations are (field-combination, sort-field) pairs. An empty
/// registry rejects every query, including unfiltered ones — the
/// zero-field combination must be declared too.
#[derive(Debug, Clone, Default)]
pub struct IndexRegistry {
    combos: AHashSet<(u16, SortField)>,
}

impl IndexRegistry {
    /// A registry with nothing declared. Useful in tests exercising the
    /// missing-index path.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Declare every combination in the power set of filterable fields,
    /// crossed with every sortable field.
    pub fn full_power_set() -> Self {
        let mut combos = AHashSet::default();
        let all_masks = 1u32 << FilterField::ALL.len();
        for mask in 0..all_masks {
            for sort in SortField::ALL {
                combos.insert((mask as u16, sort));
            }
        }
        let registry = Self { combos };
        tracing::debug!(
            "Provisioned {} composite index declarations",
            registry.len()
        );
        registry
    }

    /// Declare a single composite index.
    pub fn declare(&mut self, fields: &[FilterField], sort: SortField) {
        let mask = fields.iter().fold(0u16, |m, f| m | f.bit());
        self.combos.insert((mask, sort));
    }

    /// Whether a (combination, sort) pair has a backing index.
    pub(crate) fn covers(&self, mask: u16, sort: SortField) -> bool {
        self.combos.contains(&(mask, sort))
    }

    /// Whether a combination is indexed under any sort order. Count
    /// queries have no sort component.
    pub(crate) fn covers_fields(&self, mask: u16) -> bool {
        SortField::ALL.iter().any(|sort| self.covers(mask, *sort))
    }

    pub fn len(&self) -> usize {
        self.combos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }
}
