//! Trip manifests and loaders for the Interstellar Trip Calculator.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// One trip definition: where to, how long, and what ship.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TripConfig {
    pub name: String,
    #[serde(default)]
    pub destination: Option<String>,
    pub distance_ly: f64,
    pub duration_years: f64,
    pub vehicle: VehicleConfig,
    #[serde(default)]
    pub sweep: Option<SweepConfig>,
    #[serde(default)]
    pub integrator: Option<IntegratorConfig>,
}

/// Ship definition in trip manifests.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct VehicleConfig {
    pub name: String,
    pub dry_mass_kg: f64,
}

/// Exhaust-velocity sweep, as fractions of c; `end_c` is exclusive.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    #[serde(default = "default_start_c")]
    pub start_c: f64,
    #[serde(default = "default_step_c")]
    pub step_c: f64,
    #[serde(default = "default_end_c")]
    pub end_c: f64,
}

fn default_start_c() -> f64 {
    0.1
}

fn default_step_c() -> f64 {
    0.1
}

fn default_end_c() -> f64 {
    1.0
}

/// Integrator overrides; absent fields keep the integrator defaults.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct IntegratorConfig {
    #[serde(default)]
    pub time_step_s: Option<f64>,
    #[serde(default)]
    pub max_steps: Option<u64>,
    #[serde(default)]
    pub trace_interval_years: Option<f64>,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("trip '{0}' not found in catalog")]
    NotFound(String),
    #[error("trip catalog is empty")]
    EmptyCatalog,
}

/// Load trip manifests from a TOML file, a YAML list, or a directory of TOML files.
pub fn load_trips<P: AsRef<Path>>(path: P) -> Result<Vec<TripConfig>, ConfigError> {
    load_records(path)
}

/// Pick a trip by case-insensitive name, or the first one when no name is given.
pub fn select_trip<'a>(
    trips: &'a [TripConfig],
    requested: Option<&str>,
) -> Result<&'a TripConfig, ConfigError> {
    let first = trips.first().ok_or(ConfigError::EmptyCatalog)?;
    match requested {
        Some(name) => {
            let upper = name.to_uppercase();
            trips
                .iter()
                .find(|trip| trip.name.to_uppercase() == upper)
                .ok_or_else(|| ConfigError::NotFound(name.to_string()))
        }
        None => Ok(first),
    }
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const BARNARD: &str = r#"
name = "Barnard"
destination = "Barnard's Star"
distance_ly = 5.96
duration_years = 60.0

[vehicle]
name = "Seedship"
dry_mass_kg = 2.0e5

[sweep]
start_c = 0.2

[integrator]
time_step_s = 7200.0
"#;

    #[test]
    fn toml_file_yields_one_trip_with_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().expect("temp");
        file.write_all(BARNARD.as_bytes()).expect("write");

        let trips = load_trips(file.path()).expect("load");
        assert_eq!(trips.len(), 1);
        let trip = &trips[0];
        assert_eq!(trip.vehicle.name, "Seedship");
        let sweep = trip.sweep.expect("sweep");
        assert_eq!(sweep.start_c, 0.2);
        assert_eq!(sweep.step_c, 0.1);
        assert_eq!(sweep.end_c, 1.0);
        let integrator = trip.integrator.expect("integrator");
        assert_eq!(integrator.time_step_s, Some(7200.0));
        assert_eq!(integrator.max_steps, None);
    }

    #[test]
    fn directory_loads_sorted_toml_and_skips_others() {
        let dir = tempfile::tempdir().expect("dir");
        std::fs::write(dir.path().join("b_barnard.toml"), BARNARD).expect("write");
        std::fs::write(
            dir.path().join("a_near.toml"),
            "name = \"Near\"\ndistance_ly = 1.0\nduration_years = 20.0\n[vehicle]\nname = \"Probe\"\ndry_mass_kg = 1000.0\n",
        )
        .expect("write");
        std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

        let trips = load_trips(dir.path()).expect("load");
        let names: Vec<_> = trips.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Near", "Barnard"]);
        assert!(trips[0].sweep.is_none());
    }

    #[test]
    fn yaml_list_is_supported() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().expect("temp");
        writeln!(
            file,
            "- name: Tau Ceti\n  distance_ly: 11.9\n  duration_years: 120\n  vehicle:\n    name: Ark\n    dry_mass_kg: 1.0e7"
        )
        .expect("write");
        let trips = load_trips(file.path()).expect("load");
        assert_eq!(trips[0].name, "Tau Ceti");
        assert_eq!(trips[0].vehicle.dry_mass_kg, 1.0e7);
    }

    #[test]
    fn select_trip_by_name_or_default() {
        let trips: Vec<TripConfig> = vec![toml::from_str(BARNARD).expect("parse")];
        assert_eq!(select_trip(&trips, None).expect("default").name, "Barnard");
        assert_eq!(select_trip(&trips, Some("barnard")).expect("named").name, "Barnard");
        assert!(matches!(
            select_trip(&trips, Some("Vega")),
            Err(ConfigError::NotFound(name)) if name == "Vega"
        ));
        assert!(matches!(select_trip(&[], None), Err(ConfigError::EmptyCatalog)));
    }
}
