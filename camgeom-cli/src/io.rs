use crate::export::ExportError;
use camgeom_core::nalgebra::DVector;
use camgeom_core::{PointSet, ProjectionError};
use camgeom_pinhole::CameraSettings;
use log::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unable to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to write to stdout: {0}")]
    Stdout(std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Depths are accepted either as a flat array or as a single row.
#[derive(Deserialize)]
#[serde(untagged)]
enum Depths {
    Flat(Vec<f64>),
    Rows(Vec<Vec<f64>>),
}

/// Parses a point set written as its rows and checks its dimension.
pub fn parse_points(text: &str, what: &'static str, dim: usize) -> Result<PointSet, CliError> {
    let rows: Vec<Vec<f64>> = serde_json::from_str(text)?;
    let points = PointSet::from_rows(&rows)?;
    points.expect_dim(what, dim)?;
    Ok(points)
}

/// Parses depths written either as `[z0, z1, ...]` or as `[[z0, z1, ...]]`.
pub fn parse_depths(text: &str) -> Result<DVector<f64>, CliError> {
    match serde_json::from_str::<Depths>(text)? {
        Depths::Flat(depths) => Ok(DVector::from_vec(depths)),
        Depths::Rows(rows) => {
            let depths = PointSet::from_rows(&rows)?;
            depths.expect_dim("depth rows", 1)?;
            Ok(depths.row(0).transpose())
        }
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_owned(),
        source,
    })
}

pub fn load_points(path: &Path, what: &'static str, dim: usize) -> Result<PointSet, CliError> {
    parse_points(&read(path)?, what, dim)
}

pub fn load_depths(path: &Path) -> Result<DVector<f64>, CliError> {
    parse_depths(&read(path)?)
}

/// Loads camera settings from `path`.
///
/// Without a path, or when the file does not exist, the default settings are used.
/// Any other failure to read or parse the file is an error.
pub fn load_settings(path: Option<&Path>) -> Result<CameraSettings, CliError> {
    let path = match path {
        Some(path) => path,
        None => {
            info!("used default settings");
            return Ok(CameraSettings::default());
        }
    };
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let settings = serde_json::from_str(&text)?;
            info!("loaded existing settings");
            Ok(settings)
        }
        Err(source) if source.kind() == ErrorKind::NotFound => {
            warn!(
                "settings file {} does not exist, used default settings",
                path.display()
            );
            Ok(CameraSettings::default())
        }
        Err(source) => Err(CliError::Io {
            path: path.to_owned(),
            source,
        }),
    }
}

pub fn create(path: &Path) -> Result<File, CliError> {
    File::create(path).map_err(|source| CliError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Writes `value` as pretty JSON to `path`, or to stdout when no path is given.
pub fn write_json(path: Option<&Path>, value: &impl Serialize) -> Result<(), CliError> {
    match path {
        Some(path) => serde_json::to_writer_pretty(create(path)?, value)?,
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, value)?;
            writeln!(lock).map_err(CliError::Stdout)?;
        }
    }
    Ok(())
}
