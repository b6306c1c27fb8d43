//! Condition icons: small ASCII sprites keyed by OpenWeatherMap icon code
//!
//! Every sprite row is a run of colored segments padded to `SPRITE_WIDTH`,
//! so centered rows line up.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};

/// Rows in every sprite
pub const SPRITE_HEIGHT: u16 = 5;
const SPRITE_ROWS: usize = SPRITE_HEIGHT as usize;
const SPRITE_WIDTH: usize = 17;

type Row = &'static [(&'static str, Color)];

const SUN: Color = Color::Yellow;
const CLOUD: Color = Color::Rgb(170, 170, 185);
const DARK_CLOUD: Color = Color::Rgb(120, 120, 140);
const MIST: Color = Color::Rgb(180, 180, 190);
const DRIZZLE_DROP: Color = Color::Rgb(130, 170, 200);
const RAIN_DROP: Color = Color::Rgb(80, 140, 200);
const SNOWFLAKE: Color = Color::Rgb(200, 220, 255);

const CLEAR_SKY: [Row; SPRITE_ROWS] = [
    &[("    \\   |   /    ", SUN)],
    &[("      .-'-.      ", SUN)],
    &[("  -- (     ) --  ", SUN)],
    &[("      `-.-'      ", SUN)],
    &[("    /   |   \\    ", SUN)],
];

const PARTLY_CLOUDY: [Row; SPRITE_ROWS] = [
    &[("   \\  |  /       ", SUN)],
    &[("    .-'-.", SUN), ("  .--.  ", CLOUD)],
    &[(" - (  ", SUN), ("  .-(    ).", CLOUD)],
    &[("     (___.__)__) ", CLOUD)],
    &[("                 ", CLOUD)],
];

const CLOUDY: [Row; SPRITE_ROWS] = [
    &[("        .--.     ", CLOUD)],
    &[("     .-(    ).   ", CLOUD)],
    &[("    (___.__)__)  ", CLOUD)],
    &[("     ~~~~~~~~    ", DARK_CLOUD)],
    &[("                 ", CLOUD)],
];

const FOG: [Row; SPRITE_ROWS] = [
    &[("        .--.     ", DARK_CLOUD)],
    &[("     .-(    ).   ", DARK_CLOUD)],
    &[("  _ - _ - _ - _  ", MIST)],
    &[("   _ - _ - _ -   ", MIST)],
    &[("  _ - _ - _ - _  ", MIST)],
];

const DRIZZLE: [Row; SPRITE_ROWS] = [
    &[("        .--.     ", CLOUD)],
    &[("     .-(    ).   ", CLOUD)],
    &[("    (___.__)__)  ", CLOUD)],
    &[("      '  '  '    ", DRIZZLE_DROP)],
    &[("     '  '  '     ", DRIZZLE_DROP)],
];

const RAIN: [Row; SPRITE_ROWS] = [
    &[("        .--.     ", CLOUD)],
    &[("     .-(    ).   ", CLOUD)],
    &[("    (___.__)__)  ", CLOUD)],
    &[("     ,',',','    ", RAIN_DROP)],
    &[("    ,',',','     ", RAIN_DROP)],
];

const SNOW: [Row; SPRITE_ROWS] = [
    &[("        .--.     ", CLOUD)],
    &[("     .-(    ).   ", CLOUD)],
    &[("    (___.__)__)  ", CLOUD)],
    &[("     *  *  *     ", SNOWFLAKE)],
    &[("    *  *  *      ", SNOWFLAKE)],
];

const THUNDERSTORM: [Row; SPRITE_ROWS] = [
    &[("        .--.     ", DARK_CLOUD)],
    &[("     .-(    ).   ", DARK_CLOUD)],
    &[("    (___.__)__)  ", DARK_CLOUD)],
    &[("     ,", RAIN_DROP), (" _/  _/    ", SUN)],
    &[("    ,' ", RAIN_DROP), ("/   /     ", SUN)],
];
/// Sky condition derived from the first two characters of an icon code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Thunderstorm,
    Unknown,
}

impl Condition {
    pub const ALL: [Condition; 9] = [
        Condition::Clear,
        Condition::PartlyCloudy,
        Condition::Cloudy,
        Condition::Fog,
        Condition::Drizzle,
        Condition::Rain,
        Condition::Snow,
        Condition::Thunderstorm,
        Condition::Unknown,
    ];

    /// `"01d"`, `"10n"`, ... The day/night suffix is ignored and an empty
    /// code means the bundled clear-sky icon.
    pub fn from_icon_code(code: &str) -> Self {
        match code.get(..2) {
            _ if code.is_empty() => Condition::Clear,
            Some("01") => Condition::Clear,
            Some("02") => Condition::PartlyCloudy,
            Some("03" | "04") => Condition::Cloudy,
            Some("09") => Condition::Drizzle,
            Some("10") => Condition::Rain,
            Some("11") => Condition::Thunderstorm,
            Some("13") => Condition::Snow,
            Some("50") => Condition::Fog,
            _ => Condition::Unknown,
        }
    }

    fn rows(self) -> &'static [Row; SPRITE_ROWS] {
        match self {
            Condition::Clear => &CLEAR_SKY,
            Condition::PartlyCloudy => &PARTLY_CLOUDY,
            Condition::Cloudy | Condition::Unknown => &CLOUDY,
            Condition::Fog => &FOG,
            Condition::Drizzle => &DRIZZLE,
            Condition::Rain => &RAIN,
            Condition::Snow => &SNOW,
            Condition::Thunderstorm => &THUNDERSTORM,
        }
    }

    pub fn sprite(self) -> Text<'static> {
        self.rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&(glyphs, color)| Span::styled(glyphs, Style::default().fg(color)))
                    .collect::<Line>()
            })
            .collect()
    }

    /// Single-cell stand-in when the sprite does not fit
    pub fn emoji(self) -> &'static str {
        match self {
            Condition::Clear => "\u{2600}\u{fe0f}",
            Condition::PartlyCloudy => "\u{26c5}",
            Condition::Cloudy | Condition::Unknown => "\u{2601}\u{fe0f}",
            Condition::Fog => "\u{1f32b}\u{fe0f}",
            Condition::Drizzle => "\u{1f326}\u{fe0f}",
            Condition::Rain => "\u{1f327}\u{fe0f}",
            Condition::Snow => "\u{2744}\u{fe0f}",
            Condition::Thunderstorm => "\u{26c8}\u{fe0f}",
        }
    }
}

/// Sprite for an icon code, or `None` when fewer than `SPRITE_HEIGHT` rows are free
pub fn condition_sprite(icon_code: &str, available_height: u16) -> Option<Text<'static>> {
    (available_height >= SPRITE_HEIGHT).then(|| Condition::from_icon_code(icon_code).sprite())
}

pub fn condition_emoji(icon_code: &str) -> &'static str {
    Condition::from_icon_code(icon_code).emoji()
}
