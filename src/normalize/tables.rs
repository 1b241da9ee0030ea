//! Fixed enumeration tables for categorical fields.

use serde::Serialize;

/// Weather condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Sunny,
    Cloudy,
    Rain,
    Snow,
    Fog,
    Typhoon,
}

impl Weather {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "晴" | "晴れ" => Some(Weather::Sunny),
            "曇" | "曇り" => Some(Weather::Cloudy),
            "雨" => Some(Weather::Rain),
            "雪" => Some(Weather::Snow),
            "霧" => Some(Weather::Fog),
            "台風" => Some(Weather::Typhoon),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Cloudy => "cloudy",
            Weather::Rain => "rain",
            Weather::Snow => "snow",
            Weather::Fog => "fog",
            Weather::Typhoon => "typhoon",
        }
    }
}

/// Sixteen-point wind direction, plus calm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WindDirection {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
    Calm,
}

const COMPASS: [WindDirection; 16] = [
    WindDirection::N,
    WindDirection::NNE,
    WindDirection::NE,
    WindDirection::ENE,
    WindDirection::E,
    WindDirection::ESE,
    WindDirection::SE,
    WindDirection::SSE,
    WindDirection::S,
    WindDirection::SSW,
    WindDirection::SW,
    WindDirection::WSW,
    WindDirection::W,
    WindDirection::WNW,
    WindDirection::NW,
    WindDirection::NNW,
];

impl WindDirection {
    /// Map the numeric suffix of an `is-windN` marker class.
    /// 1 is north, counting clockwise; 17 means no wind.
    pub fn from_marker(n: u32) -> Option<Self> {
        match n {
            1..=16 => Some(COMPASS[(n - 1) as usize]),
            17 => Some(WindDirection::Calm),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WindDirection::N => "N",
            WindDirection::NNE => "NNE",
            WindDirection::NE => "NE",
            WindDirection::ENE => "ENE",
            WindDirection::E => "E",
            WindDirection::ESE => "ESE",
            WindDirection::SE => "SE",
            WindDirection::SSE => "SSE",
            WindDirection::S => "S",
            WindDirection::SSW => "SSW",
            WindDirection::SW => "SW",
            WindDirection::WSW => "WSW",
            WindDirection::W => "W",
            WindDirection::WNW => "WNW",
            WindDirection::NW => "NW",
            WindDirection::NNW => "NNW",
            WindDirection::Calm => "CALM",
        }
    }
}

/// Lane from a boat-color or boat-type marker suffix
pub fn lane_from_marker(n: u32) -> Option<u8> {
    (1..=6).contains(&n).then_some(n as u8)
}

/// Bet type of a payout line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BetType {
    Trifecta,
    Trio,
    Exacta,
    Quinella,
    QuinellaPlace,
    Win,
    Place,
}

impl BetType {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "3連単" | "３連単" => Some(BetType::Trifecta),
            "3連複" | "３連複" => Some(BetType::Trio),
            "2連単" | "２連単" => Some(BetType::Exacta),
            "2連複" | "２連複" => Some(BetType::Quinella),
            "拡連複" => Some(BetType::QuinellaPlace),
            "単勝" => Some(BetType::Win),
            "複勝" => Some(BetType::Place),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BetType::Trifecta => "TRIFECTA",
            BetType::Trio => "TRIO",
            BetType::Exacta => "EXACTA",
            BetType::Quinella => "QUINELLA",
            BetType::QuinellaPlace => "QUINELLA_PLACE",
            BetType::Win => "WIN",
            BetType::Place => "PLACE",
        }
    }
}

/// Winning maneuver (kimarite)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Maneuver {
    Nige,
    Sashi,
    Makuri,
    Makurizashi,
    Nuki,
    Megumare,
}

impl Maneuver {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "逃げ" => Some(Maneuver::Nige),
            "差し" => Some(Maneuver::Sashi),
            "まくり" => Some(Maneuver::Makuri),
            "まくり差し" => Some(Maneuver::Makurizashi),
            "抜き" => Some(Maneuver::Nuki),
            "恵まれ" => Some(Maneuver::Megumare),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Maneuver::Nige => "nige",
            Maneuver::Sashi => "sashi",
            Maneuver::Makuri => "makuri",
            Maneuver::Makurizashi => "makurizashi",
            Maneuver::Nuki => "nuki",
            Maneuver::Megumare => "megumare",
        }
    }
}
