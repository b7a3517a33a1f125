//! crates/logging/src/config.rs
//! Verbosity configuration derived from `-v` counts and `--debug` flags.

use super::levels::{DiagnosticFlag, DiagnosticLevels, UnknownFlag};

/// Combined verbosity configuration.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Per-category levels.
    pub levels: DiagnosticLevels,
}

impl VerbosityConfig {
    /// Creates a configuration from the number of `-v` flags given.
    ///
    /// Level 1 reports what the tools do to each path, level 2 adds codec
    /// debugging, and level 3 or more traces every entry.
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();

        match level {
            0 => {}
            1 => {
                config.levels.cli = 1;
                config.levels.xattr = 1;
                config.levels.acl = 1;
            }
            2 => {
                config.levels.cli = 2;
                config.levels.xattr = 2;
                config.levels.acl = 2;
                config.levels.wire = 1;
            }
            _ => {
                for flag in DiagnosticFlag::ALL {
                    config.levels.set(flag, 3);
                }
            }
        }

        config
    }

    /// Applies a flag string such as `wire2` or `acl`.
    ///
    /// A missing level means `1`; `ALL` raises every category.
    pub fn apply_flag(&mut self, spec: &str) -> Result<(), UnknownFlag> {
        let split = spec
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(spec.len());
        let (name, digits) = spec.split_at(split);
        let level = if digits.is_empty() {
            1
        } else {
            digits
                .parse::<u8>()
                .map_err(|_| UnknownFlag(spec.to_owned()))?
        };

        if name.eq_ignore_ascii_case("all") {
            for flag in DiagnosticFlag::ALL {
                self.levels.set(flag, level);
            }
            return Ok(());
        }

        let flag: DiagnosticFlag = name.parse().map_err(|_| UnknownFlag(spec.to_owned()))?;
        self.levels.set(flag, level);
        Ok(())
    }

    /// Returns true if every category is silent.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        DiagnosticFlag::ALL
            .into_iter()
            .all(|flag| self.levels.get(flag) == 0)
    }

    /// Renders the configuration as `tracing-subscriber` filter directives.
    ///
    /// Warnings are always shown; each enabled category adds a directive for
    /// its target.
    #[must_use]
    pub fn directives(&self) -> String {
        let mut out = String::from("warn");
        for flag in DiagnosticFlag::ALL {
            let level = match self.levels.get(flag) {
                0 => continue,
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            out.push(',');
            out.push_str(flag.target());
            out.push('=');
            out.push_str(level);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_config_only_shows_warnings() {
        let config = VerbosityConfig::from_verbose_level(0);
        assert!(config.is_quiet());
        assert_eq!(config.directives(), "warn");
    }

    #[test]
    fn apply_flag_parses_levels() {
        let mut config = VerbosityConfig::default();
        config.apply_flag("wire2").unwrap();
        config.apply_flag("acl").unwrap();
        assert_eq!(config.levels.wire, 2);
        assert_eq!(config.levels.acl, 1);
        assert_eq!(
            config.directives(),
            "warn,nfs4acl::wire=debug,nfs4acl::acl=info"
        );
    }

    #[test]
    fn apply_flag_all_raises_everything() {
        let mut config = VerbosityConfig::default();
        config.apply_flag("ALL3").unwrap();
        for flag in DiagnosticFlag::ALL {
            assert_eq!(config.levels.get(flag), 3);
        }
    }

    #[test]
    fn apply_flag_rejects_unknown_names() {
        let mut config = VerbosityConfig::default();
        assert_eq!(
            config.apply_flag("proto2"),
            Err(UnknownFlag("proto2".to_owned()))
        );
        assert_eq!(
            config.apply_flag("acl999"),
            Err(UnknownFlag("acl999".to_owned()))
        );
        assert!(config.is_quiet());
    }
}
