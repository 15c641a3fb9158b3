//! Identifier newtypes.
//!
//! Every entity the engine touches is keyed by an integer id assigned by
//! the surrounding store. Wrapping them keeps a `StudentId` from being
//! passed where a `TeacherId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(
    /// Planning period identifier.
    PeriodId(u32)
);
id_newtype!(
    /// Teacher identifier.
    TeacherId(u32)
);
id_newtype!(
    /// Student identifier.
    StudentId(u32)
);
id_newtype!(
    /// Subject identifier.
    SubjectId(u32)
);
id_newtype!(
    /// Time-slot identifier (a period of the school day).
    TimeSlotId(u32)
);
id_newtype!(
    /// Quota (request or contract line) identifier.
    QuotaId(u32)
);
id_newtype!(
    /// Assignment container identifier.
    ContainerId(u64)
);
id_newtype!(
    /// Placed lesson identifier.
    LessonId(u64)
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_ordering() {
        assert_eq!(TeacherId(7).to_string(), "7");
        assert!(TimeSlotId(1) < TimeSlotId(2));
        assert_eq!(StudentId::from(3), StudentId(3));
    }

    #[test]
    fn test_id_serde_transparent() {
        let json = serde_json::to_string(&LessonId(42)).unwrap();
        assert_eq!(json, "42");
        let back: LessonId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LessonId(42));
    }
}
