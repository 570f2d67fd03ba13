#![allow(unused_macros)]

macro_rules! cfg_async {
    ($($item:item)*) => {
        $(
            #[cfg(feature = "async")]
            #[cfg_attr(docsrs, doc(cfg(feature = "async")))]
            $item
        )*
    }
}

macro_rules! cfg_logger {
    ($($item:item)*) => {
        $(
            #[cfg(any(feature = "logger_env", feature = "logger_log4rs"))]
            #[cfg_attr(docsrs, doc(cfg(any(feature = "logger_env", feature = "logger_log4rs"))))]
            $item
        )*
    }
}
