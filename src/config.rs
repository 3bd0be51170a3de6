use confy;
use lazy_static::*;
use palette;
use log::*;
use enum_map::{enum_map, Enum, EnumMap};
use serde::{Serialize, Deserialize};

type Color = palette::rgb::Rgba;

lazy_static! {
    pub static ref COLORNAMES :EnumMap<PanelColorName, &'static str> = {
        enum_map! {
            PanelColorName::Background => "Panel background",
            PanelColorName::Frame => "Panel frame",
            PanelColorName::Track => "Track",
            PanelColorName::TrackHover => "Track hover",
            PanelColorName::TrackInRoute => "Track in route",
            PanelColorName::PointAhead => "Point ahead",
            PanelColorName::PointDiverge => "Point diverge",
            PanelColorName::PointMoving => "Point moving",
            PanelColorName::PointHover => "Point hover",
            PanelColorName::PointUnoccupied => "Point unoccupied",
            PanelColorName::PointConflict => "Point conflict",
            PanelColorName::Boundary => "Point boundary box",
            PanelColorName::Label => "Point label",
            PanelColorName::SignalCase => "Signal case",
            PanelColorName::SignalStop => "Signal stop aspect",
            PanelColorName::SignalStopDim => "Signal stop aspect dimmed",
            PanelColorName::SignalProceed => "Signal proceed aspect",
            PanelColorName::SignalProceedDim => "Signal proceed aspect dimmed",
            PanelColorName::MonitorText => "Serial monitor text",
        }
    };
}

#[derive(Debug)]
pub struct Config {
    pub colors :EnumMap<PanelColorName,Color>,
    pub connection :ConnectionSettings,
}

/// serde-friendly representation of the color config
#[derive(Serialize,Deserialize)]
#[derive(Debug)]
pub struct ConfigString {
    pub colors :Vec<(String,String)>,  // name -> hex color
}

/// Serial connection settings, read from a local settings.toml.
#[derive(Serialize,Deserialize)]
#[derive(Debug,Clone,PartialEq)]
pub struct ConnectionSettings {
    pub port :String,
    pub baud :u32,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        ConnectionSettings { port: "/dev/ttyUSB0".to_string(), baud: 9600 }
    }
}

#[derive(Serialize,Deserialize)]
#[derive(Debug,Default)]
struct SettingsFile {
    serial :Option<ConnectionSettings>,
}

pub fn read_connection_settings() -> ConnectionSettings {
    match std::fs::read_to_string("settings.toml") {
        Ok(s) => connection_settings_from_str(&s),
        Err(e) => {
            error!("Could not read settings.toml: {}", e);
            Default::default()
        },
    }
}

pub fn connection_settings_from_str(s :&str) -> ConnectionSettings {
    match toml::from_str::<SettingsFile>(s) {
        Ok(f) => f.serial.unwrap_or_else(|| {
            error!("settings.toml has no [serial] section, using defaults.");
            Default::default()
        }),
        Err(e) => {
            error!("Could not parse settings.toml: {}", e);
            Default::default()
        },
    }
}

fn to_hex(c :Color) -> String {
    use palette::encoding::pixel::Pixel;
    let px :[u8;4] = c.into_format().into_raw();
    format!("#{:02x}{:02x}{:02x}{:02x}", px[0],px[1],px[2],px[3])
}

fn from_hex(mut s :&str) -> Result<Color, ()> {
    // chop off '#' char
    if s.len() % 2 != 0 { s = &s[1..]; }
    if !(s.len() == 6 || s.len() == 8) { return Err(()); }
    let r: u8 = u8::from_str_radix(&s[0..2], 16).map_err(|_| ())?;
    let g: u8 = u8::from_str_radix(&s[2..4], 16).map_err(|_| ())?;
    let b: u8 = u8::from_str_radix(&s[4..6], 16).map_err(|_| ())?;
    let a = if s.len() == 8 {
        u8::from_str_radix(&s[6..8], 16).map_err(|_| ())?
    } else { 255u8 };

    Ok(Color::new(r as f32 / 255.0,
                  g as f32 / 255.0,
                  b as f32 / 255.0,
                  a as f32 / 255.0))
}

impl Default for ConfigString {
    fn default() -> Self {
        let c :Config = Default::default();
        c.to_config_string()
    }
}

impl Config {
    pub fn load() -> Self {
        let config_s :ConfigString = confy::load(env!("CARGO_PKG_NAME")).
            unwrap_or_else(|e| {
                error!("Could not load config file: {}", e);
                Default::default()
            });
        let mut config = Config::from_config_string(&config_s);
        config.connection = read_connection_settings();
        config
    }

    pub fn save(&self) {
        if let Err(e) = confy::store(env!("CARGO_PKG_NAME"), self.to_config_string()) {
            error!("Could not save config file: {}", e);
        }
    }

    pub fn to_config_string(&self) -> ConfigString {
        let mut colors = Vec::new();
        for (c,val) in self.colors.iter() {
            colors.push((COLORNAMES[c].to_string(), to_hex(*val)));
        }
        ConfigString { colors: colors }
    }

    pub fn from_config_string(cs :&ConfigString) -> Self {
        let mut colors = default_colors();
        for (name,col_hex) in cs.colors.iter() {
            for (col_choice, col_name) in COLORNAMES.iter() {
                if *col_name == name.as_str() {
                    if let Ok(c) = from_hex(col_hex) {
                        colors[col_choice] = c;
                    }
                }
            }
        }

        Config {
            colors: colors,
            connection: Default::default(),
        }
    }

    /// Packed RGBA (imgui byte order: r in the low byte).
    pub fn color_u32(&self, name :PanelColorName) -> u32 {
        let c = self.colors[name];
        let f = |x :f32| (x.max(0.0).min(1.0) * 255.0) as u32;
        f(c.color.red) | f(c.color.green) << 8 | f(c.color.blue) << 16 | f(c.alpha) << 24
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            colors: default_colors(),
            connection: Default::default(),
        }
    }
}

pub fn default_colors() -> EnumMap<PanelColorName, Color> {
    use palette::named;
    let c = |nm :palette::Srgb<u8>| {
        let f :palette::Srgb<f32> = palette::Srgb::from_format(nm);
        let a :Color = f.into();
        a
    };
    let rgb = |r :u8, g :u8, b :u8| c(palette::Srgb::new(r,g,b));
    enum_map! {
        PanelColorName::Background => c(named::BLACK),
        PanelColorName::Frame => c(named::WHITE),
        PanelColorName::Track => c(named::WHITE),
        PanelColorName::TrackHover => rgb(235,52,61),
        PanelColorName::TrackInRoute => rgb(52,235,140),
        PanelColorName::PointAhead => rgb(55,235,52),
        PanelColorName::PointDiverge => rgb(52,140,235),
        PanelColorName::PointMoving => rgb(235,216,52),
        PanelColorName::PointHover => rgb(235,52,61),
        PanelColorName::PointUnoccupied => c(named::DARKGREY),
        PanelColorName::PointConflict => c(named::ORANGERED),
        PanelColorName::Boundary => c(named::WHITE),
        PanelColorName::Label => c(named::WHITE),
        PanelColorName::SignalCase => c(named::WHITE),
        PanelColorName::SignalStop => rgb(255,0,0),
        PanelColorName::SignalStopDim => rgb(75,0,0),
        PanelColorName::SignalProceed => rgb(0,255,0),
        PanelColorName::SignalProceedDim => rgb(0,60,0),
        PanelColorName::MonitorText => c(named::WHITE),
    }
}

#[derive(Enum, Debug, PartialEq, Eq, Copy, Clone)]
#[derive(Serialize,Deserialize)]
pub enum PanelColorName {
    Background,
    Frame,
    Track,
    TrackHover,
    TrackInRoute,
    PointAhead,
    PointDiverge,
    PointMoving,
    PointHover,
    PointUnoccupied,
    PointConflict,
    Boundary,
    Label,
    SignalCase,
    SignalStop,
    SignalStopDim,
    SignalProceed,
    SignalProceedDim,
    MonitorText,
}
