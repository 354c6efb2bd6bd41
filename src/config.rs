use clap::Parser;
use std::time::Duration;
use thiserror::Error;
use tickcraft::components::DEFAULT_IMAGE_SRC;

/// Shows a number next to an image, and adds one to it every period.
#[derive(Parser, Debug)]
#[command(name = "counter", version, about)]
pub struct Args {
    /// Time between increments, in milliseconds
    #[arg(long, value_name = "MS", env = "COUNTER_PERIOD_MS", default_value_t = 1000)]
    pub period_ms: u64,

    /// The value shown before the first increment
    #[arg(
        long,
        value_name = "N",
        env = "COUNTER_INITIAL",
        default_value_t = 1,
        allow_negative_numbers = true
    )]
    pub initial: i64,

    /// Where the image shown next to the number lives
    #[arg(long, value_name = "URL", default_value = DEFAULT_IMAGE_SRC)]
    pub image_src: String,

    /// Text shown in place of the image
    #[arg(long, value_name = "TEXT", default_value = "logo")]
    pub image_alt: String,

    /// Exit after this many increments
    #[arg(long, value_name = "N")]
    pub ticks: Option<u64>,

    /// Print the first frame and exit
    #[arg(long, conflicts_with = "ticks")]
    pub once: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the period must be greater than zero")]
    ZeroPeriod,
    #[error("the image needs a source or alternative text")]
    MissingImage,
}

/// How long the counter runs for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Once,
    Ticks(u64),
    Forever,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub period: Duration,
    pub initial_value: i64,
    pub image_src: String,
    pub image_alt: String,
    pub mode: Mode,
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if args.period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if args.image_src.is_empty() && args.image_alt.is_empty() {
            return Err(ConfigError::MissingImage);
        }
        let mode = match (args.once, args.ticks) {
            (true, _) => Mode::Once,
            (false, Some(n)) => Mode::Ticks(n),
            (false, None) => Mode::Forever,
        };
        Ok(Self {
            period: Duration::from_millis(args.period_ms),
            initial_value: args.initial,
            image_src: args.image_src,
            image_alt: args.image_alt,
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, ConfigError> {
        let args = Args::try_parse_from(std::iter::once("counter").chain(args.iter().copied()))
            .expect("arguments should parse");
        Config::try_from(args)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.period, Duration::from_secs(1));
        assert_eq!(config.initial_value, 1);
        assert_eq!(config.image_src, DEFAULT_IMAGE_SRC);
        assert_eq!(config.image_alt, "logo");
        assert_eq!(config.mode, Mode::Forever);
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "--period-ms",
            "3000",
            "--initial",
            "-5",
            "--image-alt",
            "",
            "--ticks",
            "2",
        ])
        .unwrap();
        assert_eq!(config.period, Duration::from_secs(3));
        assert_eq!(config.initial_value, -5);
        assert_eq!(config.image_alt, "");
        assert_eq!(config.mode, Mode::Ticks(2));

        assert_eq!(parse(&["--once"]).unwrap().mode, Mode::Once);
    }

    #[test]
    fn test_invalid() {
        assert_eq!(parse(&["--period-ms", "0"]), Err(ConfigError::ZeroPeriod));
        assert_eq!(
            parse(&["--image-src", "", "--image-alt", ""]),
            Err(ConfigError::MissingImage)
        );
        assert!(Args::try_parse_from(["counter", "--once", "--ticks", "1"]).is_err());
        assert!(Args::try_parse_from(["counter", "--period-ms", "fast"]).is_err());
    }
}
