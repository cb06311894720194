use std::{fs, io::Read, path::Path};

use crate::{Error, Result};

/// Ordered addresses for one request; the first entry is the depot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteInput {
    pub addresses: Vec<String>,
}

impl RouteInput {
    /// One address per line, blank lines ignored. When `origin` is given it
    /// becomes the depot ahead of every listed address; otherwise the first
    /// line is the depot.
    pub fn parse(text: &str, origin: Option<&str>) -> Result<Self> {
        let mut addresses: Vec<String> = origin
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .into_iter()
            .collect();
        addresses.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );

        if addresses.is_empty() {
            return Err(Error::invalid_input("No addresses provided."));
        }
        Ok(Self { addresses })
    }

    /// Reads from `path`, or stdin when `None`.
    pub fn read(path: Option<&Path>, origin: Option<&str>) -> Result<Self> {
        let text = match path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::invalid_input(format!("failed to read input {}: {e}", path.display()))
            })?,
            None => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                text
            }
        };
        Self::parse(&text, origin)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn depot(&self) -> &str {
        &self.addresses[0]
    }
}
