//! Run settings, read from a TOML file.
//!
//! Every key has a built-in default. Missing or unusable values fall back to it
//! (with a warning for unusable ones), and the effective settings are written
//! back so the file always records what was run.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use toml::map::Map;
use toml::Value;

use crate::math::{constants, Kernel, Real, DEFAULT_PRECISION};
use crate::model::OrbitalRange;
use crate::scan::MAX_DIVISOR;

type Table = Map<String, Value>;

const OBJECT_RADIUS: &str = ".0002";
const RPM: &str = "3589000";
const RESOLUTION: i64 = 2;

const SUN_RADIUS: &str = "695700";
const SUN_DENSITY: &str = "1408000000000";
const MOON_RADIUS: &str = "1737.4";
const MOON_DENSITY: &str = "3344000000000";
const EARTH_RADIUS: &str = "6371";
const EARTH_DENSITY: &str = "5514000000000";

const PERIGEE: &str = "363300";
const APOGEE: &str = "405500";
const PERIHELION: &str = "147090000";
const APHELION: &str = "152100000";

const DOT_SIZE: i64 = 5;
const BORDER: i64 = 30;
const VIS_FILE: &str = "occlusion.png";
const DEBUG_FILE: &str = "debug.log";

// Below this the half-precision equality tests stop meaning anything
const MIN_PRECISION: i64 = 16;

#[derive(Debug, Clone)]
pub struct BodySettings {
    pub mean_radius: Real,
    /// kg / km³
    pub density: Real,
}

#[derive(Debug, Clone)]
pub struct OrbitSettings {
    pub range: OrbitalRange,
    /// Fraction of the way from the near to the far end of the range.
    pub position: Real,
    /// Accepted but not used; the bodies are always laid out in a line.
    pub rotation: Real,
}

impl OrbitSettings {
    pub fn distance(&self) -> Real {
        self.range.at(&self.position)
    }
}

#[derive(Debug, Clone)]
pub struct VisSettings {
    pub enabled: bool,
    pub dot_size: u32,
    pub border: u32,
    pub file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DebugSettings {
    pub enabled: bool,
    pub file: PathBuf,
}

/// Fully resolved settings for one run. All lengths are in km.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub kernel: Kernel,
    pub object_radius: Real,
    /// Rotations per minute
    pub rpm: Real,
    /// Cells per object radius
    pub resolution: u32,
    pub light_speed: Real,
    pub gravitational_constant: Real,
    pub sun: BodySettings,
    pub moon: BodySettings,
    pub earth: BodySettings,
    pub moon_orbit: OrbitSettings,
    pub earth_orbit: OrbitSettings,
    pub vis: VisSettings,
    pub debug: DebugSettings,
}

/// A TOML settings table, optionally backed by a file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    path: Option<PathBuf>,
    table: Table,
}

impl ConfigFile {
    /// Reads the file at `path`. A missing file is an empty table; an unreadable
    /// one is reported and treated as empty.
    pub fn open(path: &Path) -> Self {
        let table = load_config_table(path).unwrap_or_else(|err| {
            warn!("{}; using defaults", err);
            Table::new()
        });
        Self {
            path: Some(path.to_owned()),
            table,
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn from_table(table: Table) -> Self {
        Self { path: None, table }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn save(&self) -> Result<(), String> {
        match &self.path {
            Some(path) => write_config_table(path, &self.table),
            None => Ok(()),
        }
    }

    fn section(&mut self, name: &str) -> &mut Table {
        let entry = self
            .table
            .entry(name.to_string())
            .or_insert_with(|| Value::Table(Table::new()));
        if !entry.is_table() {
            warn!("[{}] is not a table; replacing it", name);
            *entry = Value::Table(Table::new());
        }
        match entry {
            Value::Table(table) => table,
            _ => unreachable!("[{}] was just made a table", name),
        }
    }

    // Looks up one key, falls back to `default`, and stores the effective value.
    fn resolve<T>(
        &mut self,
        section: &str,
        key: &str,
        default: T,
        parse: impl Fn(&Value) -> Option<T>,
        store: impl Fn(&T) -> Value,
    ) -> T {
        let table = self.section(section);
        let value = match table.get(key) {
            None => {
                debug!("{}.{} is not set; using the default", section, key);
                default
            }
            Some(raw) => parse(raw).unwrap_or_else(|| {
                warn!("{}.{} = {} is not usable; using the default", section, key, raw);
                default
            }),
        };
        table.insert(key.to_string(), store(&value));
        value
    }

    pub fn real(
        &mut self,
        kernel: &Kernel,
        section: &str,
        key: &str,
        default: &str,
        valid: impl Fn(&Real) -> bool,
    ) -> Real {
        let fallback = kernel
            .parse(default)
            .unwrap_or_else(|err| panic!("built-in default for {}.{}: {}", section, key, err));
        let (_, value) = self.resolve(
            section,
            key,
            (default.to_owned(), fallback),
            |raw| {
                let text = toml_value_to_string(raw)?;
                let value = kernel.parse(&text).ok().filter(|value| valid(value))?;
                Some((text, value))
            },
            |(text, _)| Value::String(text.clone()),
        );
        value
    }

    pub fn integer(
        &mut self,
        section: &str,
        key: &str,
        default: i64,
        valid: impl Fn(i64) -> bool,
    ) -> i64 {
        self.resolve(
            section,
            key,
            default,
            |raw| {
                let parsed = match raw {
                    Value::Integer(n) => Some(*n),
                    Value::String(text) => text.trim().parse().ok(),
                    _ => None,
                };
                parsed.filter(|n| valid(*n))
            },
            |n| Value::Integer(*n),
        )
    }

    pub fn boolean(&mut self, section: &str, key: &str, default: bool) -> bool {
        self.resolve(
            section,
            key,
            default,
            |raw| match raw {
                Value::Boolean(flag) => Some(*flag),
                Value::String(text) => text.trim().parse().ok(),
                _ => None,
            },
            |flag| Value::Boolean(*flag),
        )
    }

    pub fn string(&mut self, section: &str, key: &str, default: &str) -> String {
        self.resolve(
            section,
            key,
            default.to_owned(),
            |raw| raw.as_str().map(str::trim).filter(|text| !text.is_empty()).map(ToOwned::to_owned),
            |text| Value::String(text.clone()),
        )
    }
}

fn toml_value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.trim().to_string()),
        Value::Integer(value) => Some(value.to_string()),
        Value::Float(value) => Some(value.to_string()),
        _ => None,
    }
}

fn load_config_table(path: &Path) -> Result<Table, String> {
    if !path.exists() {
        return Ok(Table::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|err| format!("read {} failed: {}", path.display(), err))?;
    if content.trim().is_empty() {
        return Ok(Table::new());
    }

    let value: Value = toml::from_str(content.as_str())
        .map_err(|err| format!("parse {} failed: {}", path.display(), err))?;
    value
        .as_table()
        .cloned()
        .ok_or_else(|| format!("{} root must be a table", path.display()))
}

fn write_config_table(path: &Path, table: &Table) -> Result<(), String> {
    let content = toml::to_string_pretty(table)
        .map_err(|err| format!("serialize {} failed: {}", path.display(), err))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| format!("create {} failed: {}", parent.display(), err))?;
        }
    }
    fs::write(path, content).map_err(|err| format!("write {} failed: {}", path.display(), err))
}

fn positive(value: &Real) -> bool {
    !value.is_zero() && !value.is_negative()
}

fn non_negative(value: &Real) -> bool {
    !value.is_negative()
}

fn fraction(value: &Real) -> bool {
    !value.is_negative() && value.to_f64() <= 1.0
}

impl RunConfig {
    /// Resolves every setting from `file`. `precision` overrides the working
    /// precision without being written back.
    pub fn resolve(file: &mut ConfigFile, precision: Option<u64>) -> Self {
        let configured = file.integer(
            "constants",
            "precision",
            DEFAULT_PRECISION as i64,
            |n| n >= MIN_PRECISION,
        ) as u64;
        let kernel = Kernel::new(precision.unwrap_or(configured).max(MIN_PRECISION as u64));
        let k = &kernel;

        let object_radius = file.real(k, "sphere", "radius", OBJECT_RADIUS, positive);
        let rpm = file.real(k, "sphere", "rpm", RPM, non_negative);
        let resolution = file.integer("sphere", "resolution", RESOLUTION, |n| {
            n >= 1 && n <= i64::from(MAX_DIVISOR)
        }) as u32;

        let light_speed = file.real(k, "constants", "light_speed", constants::SPEED_OF_LIGHT, positive);
        let gravitational_constant =
            file.real(k, "constants", "g", constants::GRAVITATIONAL_CONSTANT, positive);

        let sun = BodySettings {
            mean_radius: file.real(k, "sun", "mean_radius", SUN_RADIUS, positive),
            density: file.real(k, "sun", "density", SUN_DENSITY, non_negative),
        };
        let moon = BodySettings {
            mean_radius: file.real(k, "moon", "mean_radius", MOON_RADIUS, positive),
            density: file.real(k, "moon", "density", MOON_DENSITY, non_negative),
        };
        let moon_orbit = OrbitSettings {
            position: file.real(k, "moon", "position", "1", fraction),
            rotation: file.real(k, "moon", "rotation", "0", |_| true),
            range: OrbitalRange {
                near: file.real(k, "moon", "perigee", PERIGEE, positive),
                far: file.real(k, "moon", "apogee", APOGEE, positive),
            },
        };
        let earth = BodySettings {
            mean_radius: file.real(k, "earth", "mean_radius", EARTH_RADIUS, positive),
            density: file.real(k, "earth", "density", EARTH_DENSITY, non_negative),
        };
        let earth_orbit = OrbitSettings {
            position: file.real(k, "earth", "position", "1", fraction),
            rotation: file.real(k, "earth", "rotation", "0", |_| true),
            range: OrbitalRange {
                near: file.real(k, "earth", "perihelion", PERIHELION, positive),
                far: file.real(k, "earth", "aphelion", APHELION, positive),
            },
        };

        let vis = VisSettings {
            enabled: file.boolean("vis", "enabled", true),
            dot_size: file.integer("vis", "dot_size", DOT_SIZE, |n| (1..=64).contains(&n)) as u32,
            border: file.integer("vis", "border", BORDER, |n| (0..=1024).contains(&n)) as u32,
            file: PathBuf::from(file.string("vis", "file", VIS_FILE)),
        };
        let debug = DebugSettings {
            enabled: file.boolean("debug", "enabled", false),
            file: PathBuf::from(file.string("debug", "file", DEBUG_FILE)),
        };

        Self {
            kernel,
            object_radius,
            rpm,
            resolution,
            light_speed,
            gravitational_constant,
            sun,
            moon,
            earth,
            moon_orbit,
            earth_orbit,
            vis,
            debug,
        }
    }

    /// Reads `path`, writes the effective settings back, and resolves them.
    pub fn load(path: &Path, precision: Option<u64>) -> Self {
        let mut file = ConfigFile::open(path);
        let config = Self::resolve(&mut file, precision);
        if let Err(err) = file.save() {
            warn!("unable to write settings back: {}", err);
        }
        config
    }

    /// Built-in defaults at the given precision.
    pub fn defaults(precision: u64) -> Self {
        Self::resolve(&mut ConfigFile::in_memory(), Some(precision))
    }

    pub fn log_settings(&self) {
        info!("Precision: {} digits", self.kernel.precision());
        info!("Object radius: {} km", self.object_radius);
        info!("Rotation: {} rpm", self.rpm);
        info!("Resolution: {} cells per radius", self.resolution);
        info!("Light speed: {} km/s", self.light_speed);
        info!("G: {} km^3 kg^-1 s^-2", self.gravitational_constant);
        for (name, body) in [("Sun", &self.sun), ("Moon", &self.moon), ("Earth", &self.earth)] {
            info!(
                "{}: radius {} km, density {} kg/km^3",
                name, body.mean_radius, body.density
            );
        }
        info!(
            "Moon position {} between {} and {} km",
            self.moon_orbit.position, self.moon_orbit.range.near, self.moon_orbit.range.far
        );
        info!(
            "Earth position {} between {} and {} km",
            self.earth_orbit.position, self.earth_orbit.range.near, self.earth_orbit.range.far
        );
        info!(
            "Visualization: {} (dot {} px, border {} px, {})",
            self.vis.enabled,
            self.vis.dot_size,
            self.vis.border,
            self.vis.file.display()
        );
        info!("Debug: {} ({})", self.debug.enabled, self.debug.file.display());
    }
}
