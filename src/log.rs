#![allow(unused, reason = "logger")]

macro_rules! trace {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::trace!($($tt)*);
    };
}

macro_rules! debug {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::debug!($($tt)*);
    };
}

macro_rules! warning {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::warn!($($tt)*);
    };
}

pub(crate) use {debug, trace, warning};
