//! Stderr logging through `env_logger`, installed once by the binary.

use env_logger::Builder;
use log::LevelFilter;

pub fn builder(level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    builder.filter_level(level);
    builder
}

/// Installs the logger. A second call keeps the first one.
pub fn init(level: LevelFilter) {
    if builder(level).try_init().is_err() {
        log::debug!("logger already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_uses_configured_level() {
        assert_eq!(builder(LevelFilter::Debug).build().filter(), LevelFilter::Debug);
        assert_eq!(builder(LevelFilter::Off).build().filter(), LevelFilter::Off);
    }
}
