use std::fmt::{self, Display};

///
/// Relationship
///
/// Role of the target element as seen from the source side of a relation.
/// `AllRel` only appears as a navigation filter and matches every role.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Relationship {
    Father,
    Child,
    InfoTo,
    InfoFrom,
    InfoRel,
    Supertype,
    Subtype,
    AllRel,
}

/// Every concrete role, `AllRel` excluded.
pub const ALL_RELATIONSHIPS: [Relationship; 7] = [
    Relationship::Father,
    Relationship::Child,
    Relationship::InfoTo,
    Relationship::InfoFrom,
    Relationship::InfoRel,
    Relationship::Supertype,
    Relationship::Subtype,
];

impl Relationship {
    /// Role seen from the opposite side of the same relation.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Father => Self::Child,
            Self::Child => Self::Father,
            Self::InfoTo => Self::InfoFrom,
            Self::InfoFrom => Self::InfoTo,
            Self::InfoRel => Self::InfoRel,
            Self::Supertype => Self::Subtype,
            Self::Subtype => Self::Supertype,
            Self::AllRel => Self::AllRel,
        }
    }

    /// Relation kind implied by the role; `AllRel` implies none.
    #[must_use]
    pub const fn relation_type(self) -> Option<RelationType> {
        match self {
            Self::Father | Self::Child => Some(RelationType::FatherChild),
            Self::InfoTo | Self::InfoFrom | Self::InfoRel => Some(RelationType::Info),
            Self::Supertype | Self::Subtype => Some(RelationType::Inheritance),
            Self::AllRel => None,
        }
    }

    /// Whether a relation with role `self` passes a navigation filter.
    #[must_use]
    pub const fn matches(self, filter: Self) -> bool {
        matches!(filter, Self::AllRel) || self as u8 == filter as u8
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Father => "FATHER",
            Self::Child => "CHILD",
            Self::InfoTo => "INFO_TO",
            Self::InfoFrom => "INFO_FROM",
            Self::InfoRel => "INFO_REL",
            Self::Supertype => "SUPERTYPE",
            Self::Subtype => "SUBTYPE",
            Self::AllRel => "ALL_REL",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "FATHER" => Some(Self::Father),
            "CHILD" => Some(Self::Child),
            "INFO_TO" => Some(Self::InfoTo),
            "INFO_FROM" => Some(Self::InfoFrom),
            "INFO_REL" => Some(Self::InfoRel),
            "SUPERTYPE" => Some(Self::Supertype),
            "SUBTYPE" => Some(Self::Subtype),
            "ALL_REL" => Some(Self::AllRel),
            _ => None,
        }
    }
}

impl Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

///
/// RelationType
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum RelationType {
    FatherChild,
    Info,
    Inheritance,
}

impl RelationType {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FatherChild => "FATHER_CHILD",
            Self::Info => "INFO",
            Self::Inheritance => "INHERITANCE",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "FATHER_CHILD" => Some(Self::FatherChild),
            "INFO" => Some(Self::Info),
            "INHERITANCE" => Some(Self::Inheritance),
            _ => None,
        }
    }
}

impl Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

///
/// RelationRange
///
/// Cardinality bounds of one relation side. A `max` of [`RelationRange::MANY`]
/// means unbounded.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RelationRange {
    pub min: i16,
    pub max: i16,
}

impl RelationRange {
    pub const MANY: i16 = -1;

    pub const ZERO_TO_ONE: Self = Self::new(0, 1);
    pub const ZERO_TO_MANY: Self = Self::new(0, Self::MANY);
    pub const ONE_TO_ONE: Self = Self::new(1, 1);
    pub const ONE_TO_MANY: Self = Self::new(1, Self::MANY);

    #[must_use]
    pub const fn new(min: i16, max: i16) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn is_many(self) -> bool {
        self.max == Self::MANY
    }

    #[must_use]
    pub const fn is_mandatory(self) -> bool {
        self.min > 0
    }

    /// `min` is non-negative and `max` is either unbounded or at least
    /// `max(min, 1)`.
    #[must_use]
    pub const fn is_well_formed(self) -> bool {
        if self.min < 0 {
            return false;
        }

        self.is_many() || (self.max >= 1 && self.max >= self.min)
    }

    /// Parse one bound as written in model files: a non-negative integer,
    /// `-1`, `*` or `Many` (any case).
    #[must_use]
    pub fn parse_bound(text: &str) -> Option<i16> {
        let text = text.trim();
        if text == "*" || text.eq_ignore_ascii_case("many") {
            return Some(Self::MANY);
        }

        match text.parse::<i16>() {
            Ok(v) if v >= Self::MANY => Some(v),
            _ => None,
        }
    }
}

impl Default for RelationRange {
    fn default() -> Self {
        Self::ZERO_TO_MANY
    }
}

impl Display for RelationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_many() {
            write!(f, "{}..Many", self.min)
        } else {
            write!(f, "{}..{}", self.min, self.max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_role_is_an_involution() {
        for role in ALL_RELATIONSHIPS {
            assert_eq!(role.inverse().inverse(), role);
            assert_eq!(role.relation_type(), role.inverse().relation_type());
        }
    }

    #[test]
    fn all_rel_filter_matches_every_role() {
        for role in ALL_RELATIONSHIPS {
            assert!(role.matches(Relationship::AllRel));
            assert!(role.matches(role));
        }
        assert!(!Relationship::Father.matches(Relationship::Child));
    }

    #[test]
    fn parse_bound_accepts_many_spellings() {
        assert_eq!(RelationRange::parse_bound("Many"), Some(RelationRange::MANY));
        assert_eq!(RelationRange::parse_bound("MANY"), Some(RelationRange::MANY));
        assert_eq!(RelationRange::parse_bound("*"), Some(RelationRange::MANY));
        assert_eq!(RelationRange::parse_bound("-1"), Some(RelationRange::MANY));
        assert_eq!(RelationRange::parse_bound(" 1 "), Some(1));
        assert_eq!(RelationRange::parse_bound("-2"), None);
        assert_eq!(RelationRange::parse_bound("lots"), None);
    }

    #[test]
    fn well_formed_ranges() {
        assert!(RelationRange::ZERO_TO_MANY.is_well_formed());
        assert!(RelationRange::ONE_TO_ONE.is_well_formed());
        assert!(!RelationRange::new(2, 1).is_well_formed());
        assert!(!RelationRange::new(0, 0).is_well_formed());
        assert!(!RelationRange::new(-1, 1).is_well_formed());
    }
}
