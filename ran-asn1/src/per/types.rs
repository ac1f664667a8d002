//! Constraint descriptions driving the PER encoding of a value

/// Items per length fragment (X.691 §11.9.3.8)
pub const FRAGMENT_UNIT: usize = 16384;

/// Constrained lengths must stay below 64K, larger upper bounds fall back to
/// the unconstrained length determinant
pub const MAX_CONSTRAINED_LENGTH: usize = 65536;

/// Value constraint of an INTEGER
///
/// Missing bounds mean `MIN` / `MAX`. A lower bound alone gives a
/// semi-constrained whole number; an upper bound alone is treated as
/// unconstrained, as X.691 requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub lb: Option<i64>,
    pub ub: Option<i64>,
    pub extensible: bool,
}

impl Constraint {
    /// `INTEGER`
    pub const UNCONSTRAINED: Self = Self {
        lb: None,
        ub: None,
        extensible: false,
    };

    /// `INTEGER (lb..ub)`
    pub const fn new(lb: i64, ub: i64) -> Self {
        Self {
            lb: Some(lb),
            ub: Some(ub),
            extensible: false,
        }
    }

    /// `INTEGER (lb..ub, ...)`
    pub const fn extensible(lb: i64, ub: i64) -> Self {
        Self {
            lb: Some(lb),
            ub: Some(ub),
            extensible: true,
        }
    }

    /// `INTEGER (lb..MAX)`
    pub const fn semi_constrained(lb: i64) -> Self {
        Self {
            lb: Some(lb),
            ub: None,
            extensible: false,
        }
    }

    /// Check whether `value` satisfies the root constraint
    pub fn contains(&self, value: i64) -> bool {
        self.lb.is_none_or(|lb| value >= lb) && self.ub.is_none_or(|ub| value <= ub)
    }
}

/// SIZE constraint of a BIT STRING, OCTET STRING, character string or
/// SEQUENCE OF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeConstraint {
    pub lb: usize,
    pub ub: Option<usize>,
    pub extensible: bool,
}

impl SizeConstraint {
    /// No SIZE constraint
    pub const UNCONSTRAINED: Self = Self {
        lb: 0,
        ub: None,
        extensible: false,
    };

    /// `SIZE(n)`
    pub const fn fixed(n: usize) -> Self {
        Self {
            lb: n,
            ub: Some(n),
            extensible: false,
        }
    }

    /// `SIZE(lb..ub)`
    pub const fn new(lb: usize, ub: usize) -> Self {
        Self {
            lb,
            ub: Some(ub),
            extensible: false,
        }
    }

    /// `SIZE(lb..ub, ...)`
    pub const fn extensible(lb: usize, ub: usize) -> Self {
        Self {
            lb,
            ub: Some(ub),
            extensible: true,
        }
    }

    /// Check whether `size` satisfies the root constraint
    pub fn contains(&self, size: usize) -> bool {
        size >= self.lb && self.ub.is_none_or(|ub| size <= ub)
    }

    /// Upper bound when the length is encoded as a constrained whole number,
    /// `None` when the unconstrained length determinant applies
    pub fn constrained_ub(&self) -> Option<usize> {
        self.ub.filter(|ub| *ub < MAX_CONSTRAINED_LENGTH)
    }

    /// Whether no length determinant is encoded at all
    pub fn is_fixed(&self) -> bool {
        self.constrained_ub() == Some(self.lb)
    }

    pub(crate) fn upper(&self) -> usize {
        self.ub.unwrap_or(usize::MAX)
    }
}

/// Bits of the minimal bit-field holding offsets `0..range`
pub(crate) fn bits_for_range(range: u128) -> usize {
    if range <= 1 {
        0
    } else {
        128 - (range - 1).leading_zeros() as usize
    }
}

/// Octets of the minimal unsigned encoding of `value`, at least one
pub(crate) fn octets_for_unsigned(value: u64) -> usize {
    (64 - value.leading_zeros() as usize).div_ceil(8).max(1)
}

/// Octets of the minimal two's complement encoding of `value`
pub(crate) fn octets_for_signed(value: i64) -> usize {
    let significant = if value < 0 {
        64 - value.leading_ones() as usize
    } else {
        64 - value.leading_zeros() as usize
    };
    (significant + 1).div_ceil(8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_for_range() {
        assert_eq!(bits_for_range(1), 0);
        assert_eq!(bits_for_range(2), 1);
        assert_eq!(bits_for_range(7), 3);
        assert_eq!(bits_for_range(8), 3);
        assert_eq!(bits_for_range(9), 4);
        assert_eq!(bits_for_range(255), 8);
    }

    #[test]
    fn test_octet_counts() {
        assert_eq!(octets_for_unsigned(0), 1);
        assert_eq!(octets_for_unsigned(255), 1);
        assert_eq!(octets_for_unsigned(256), 2);
        assert_eq!(octets_for_signed(0), 1);
        assert_eq!(octets_for_signed(127), 1);
        assert_eq!(octets_for_signed(128), 2);
        assert_eq!(octets_for_signed(-128), 1);
        assert_eq!(octets_for_signed(-129), 2);
        assert_eq!(octets_for_signed(i64::MIN), 8);
    }

    #[test]
    fn test_size_constraint_classes() {
        assert!(SizeConstraint::fixed(3).is_fixed());
        assert!(!SizeConstraint::new(0, 65535).is_fixed());
        assert_eq!(SizeConstraint::new(0, 65535).constrained_ub(), Some(65535));
        assert_eq!(SizeConstraint::new(0, 65536).constrained_ub(), None);
        assert!(!SizeConstraint::fixed(70000).is_fixed());
    }

    #[test]
    fn test_constraint_contains() {
        assert!(Constraint::new(1, 65535).contains(6));
        assert!(!Constraint::new(1, 65535).contains(0));
        assert!(Constraint::semi_constrained(0).contains(i64::MAX));
        assert!(Constraint::UNCONSTRAINED.contains(i64::MIN));
    }
}
