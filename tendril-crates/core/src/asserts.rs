//! Leveled assertions. Cheap checks are always on, the expensive ones are only compiled into
//! test builds or builds with the `debug-checks` feature.

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const TENDRIL_ASSERT_LEVEL_DEFINITION: u8 = TENDRIL_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const TENDRIL_ASSERT_LEVEL_DEFINITION: u8 = TENDRIL_ASSERT_EXTREME;

pub const TENDRIL_ASSERT_SIMPLE: u8 = 1;
pub const TENDRIL_ASSERT_MODERATE: u8 = 2;
pub const TENDRIL_ASSERT_ADVANCED: u8 = 3;
pub const TENDRIL_ASSERT_EXTREME: u8 = 4;

#[macro_export]
#[doc(hidden)]
macro_rules! tendril_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::TENDRIL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::TENDRIL_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! tendril_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::TENDRIL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::TENDRIL_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! tendril_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::TENDRIL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::TENDRIL_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! tendril_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::TENDRIL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::TENDRIL_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! tendril_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::asserts::TENDRIL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::TENDRIL_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}
