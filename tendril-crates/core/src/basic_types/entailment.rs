use std::ops::Not;

/// The truth value of a propagator or constraint that is already determined by the current
/// domains, independent of any filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entailment {
    /// Holds for every assignment left in the current domains.
    True,
    /// Holds for no assignment left in the current domains.
    False,
    Unknown,
}

impl Entailment {
    /// Combines the entailment of the parts of a conjunction: one `False` decides the
    /// conjunction, it is only `True` when every part is.
    pub fn conjunction(parts: impl IntoIterator<Item = Entailment>) -> Entailment {
        let mut all_true = true;

        for part in parts {
            match part {
                Entailment::False => return Entailment::False,
                Entailment::Unknown => all_true = false,
                Entailment::True => {}
            }
        }

        if all_true {
            Entailment::True
        } else {
            Entailment::Unknown
        }
    }

    pub fn from_bool(value: bool) -> Entailment {
        if value {
            Entailment::True
        } else {
            Entailment::False
        }
    }
}

impl Not for Entailment {
    type Output = Entailment;

    fn not(self) -> Self::Output {
        match self {
            Entailment::True => Entailment::False,
            Entailment::False => Entailment::True,
            Entailment::Unknown => Entailment::Unknown,
        }
    }
}
