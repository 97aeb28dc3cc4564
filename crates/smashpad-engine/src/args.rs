//! Command-line arguments.
//!
//! `smashpad-engine [SCRIPT] [--config PATH] [--realtime]`. With no script
//! path (or `-`) the script is read from stdin.

use std::path::PathBuf;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "smashpad-config.yaml";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineArgs {
    /// Script file; `None` reads stdin.
    pub script: Option<PathBuf>,
    /// Configuration file.
    pub config: PathBuf,
    /// Pace frames against the wall clock.
    pub realtime: bool,
}

impl EngineArgs {
    /// Parse arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut script = None;
        let mut config = None;
        let mut realtime = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--realtime" => realtime = true,
                "--config" => {
                    let path = args.next().ok_or_else(|| EngineError::Usage {
                        message: "--config needs a path".to_owned(),
                    })?;
                    config = Some(PathBuf::from(path));
                }
                "-" => script = None,
                flag if flag.starts_with("--") => {
                    return Err(EngineError::Usage {
                        message: format!("unknown flag {flag}"),
                    });
                }
                path => {
                    if script.is_some() {
                        return Err(EngineError::Usage {
                            message: format!("unexpected argument {path}"),
                        });
                    }
                    script = Some(PathBuf::from(path));
                }
            }
        }

        Ok(Self {
            script,
            config: config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            realtime,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<EngineArgs, EngineError> {
        EngineArgs::parse(args.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn no_arguments_reads_stdin_with_default_config() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.script, None);
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(!args.realtime);
    }

    #[test]
    fn all_options() {
        let args = parse(&["demo.jsonl", "--config", "toy.yaml", "--realtime"]).unwrap();
        assert_eq!(args.script, Some(PathBuf::from("demo.jsonl")));
        assert_eq!(args.config, PathBuf::from("toy.yaml"));
        assert!(args.realtime);
    }

    #[test]
    fn config_without_path_is_rejected() {
        assert!(matches!(parse(&["--config"]), Err(EngineError::Usage { .. })));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(matches!(parse(&["--fast"]), Err(EngineError::Usage { .. })));
    }

    #[test]
    fn two_scripts_are_rejected() {
        assert!(matches!(parse(&["a.jsonl", "b.jsonl"]), Err(EngineError::Usage { .. })));
    }
}
