#[doc(hidden)]
#[macro_export]
macro_rules! dict {
    ($($key:expr => $value:expr),* $(,)?) => ({
        #[allow(unused_mut)]
        let mut dict = $crate::value::Dict::new();
        $(dict.insert($key.into(), $value.into());)*
        dict
    });
}

#[doc(hidden)]
#[macro_export]
macro_rules! time {
    ($what:literal, $($token:tt)*) => ({
        let start = std::time::Instant::now();
        let value = { $($token)* };
        tracing::debug!(what = $what, elapsed_ms = start.elapsed().as_millis() as u64, "timed section finished");
        value
    });
}

pub use {dict, time};
