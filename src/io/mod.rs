/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use serde::de::DeserializeOwned;
use serde::Serialize;
use snafu::prelude::*;
use std::fmt::Debug;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Errors raised when loading a configuration.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("failed to read configuration file {}: {source}", path.display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to parse YAML configuration: {source}"))]
    ParseError { source: serde_yaml::Error },
    #[snafu(display("invalid configuration: {msg}"))]
    InvalidConfig { msg: String },
}

impl PartialEq for ConfigError {
    /// No two configuration errors match
    fn eq(&self, _other: &Self) -> bool {
        false
    }
}

/// A configuration which can be loaded from YAML.
pub trait ConfigRepr: Debug + Sized + Serialize + DeserializeOwned {
    /// Checks the consistency of the loaded configuration
    fn check(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Builds the configuration representation from the path to a yaml
    fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path.as_ref()).context(ReadSnafu {
            path: path.as_ref().to_path_buf(),
        })?;
        let reader = BufReader::new(file);

        let me: Self = serde_yaml::from_reader(reader).context(ParseSnafu)?;
        me.check()?;
        Ok(me)
    }

    /// Builds a sequence of "Selves" from the provided path to a yaml
    fn load_many<P>(path: P) -> Result<Vec<Self>, ConfigError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path.as_ref()).context(ReadSnafu {
            path: path.as_ref().to_path_buf(),
        })?;
        let reader = BufReader::new(file);

        let many: Vec<Self> = serde_yaml::from_reader(reader).context(ParseSnafu)?;
        for me in &many {
            me.check()?;
        }
        Ok(many)
    }

    /// Builds the configuration from the provided string of a yaml
    fn loads(data: &str) -> Result<Self, ConfigError> {
        debug!("Loading YAML:\n{data}");
        let me: Self = serde_yaml::from_str(data).context(ParseSnafu)?;
        me.check()?;
        Ok(me)
    }
}
