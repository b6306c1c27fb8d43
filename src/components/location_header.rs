use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, ColorStop, Fill, LinearGradient, Renderer,
    fonts, integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::state::LOADING_ANIM_CYCLE_TICKS;

/// FIGlet title for the current city, tinted by temperature
pub struct LocationHeader;

pub struct LocationHeaderProps<'a> {
    /// City name, or the pending query before any result
    pub title: &'a str,
    /// `None` hides the coordinates line
    pub coords: Option<(f64, f64)>,
    pub temperature: Option<i32>,
    pub is_animating: bool,
    pub tick_count: u32,
}

/// Overhead inside the header area: 1 spacer + 1 coords line.
/// The FIGlet city name gets `area.height - HEADER_OVERHEAD`.
pub const HEADER_OVERHEAD: u16 = 2;

type Rgb = (u8, u8, u8);

/// Upper bound (exclusive, °C) of each band with its gradient endpoints
const TEMPERATURE_BANDS: [(i32, Rgb, Rgb); 4] = [
    (0, (150, 200, 255), (200, 230, 255)),  // ice
    (15, (100, 180, 255), (150, 220, 200)), // cool
    (25, (100, 200, 150), (255, 220, 100)), // mild
    (35, (255, 180, 80), (255, 120, 80)),   // warm
];
const HOT_BAND: (Rgb, Rgb) = ((255, 100, 80), (255, 60, 60));
const NO_DATA_BAND: (Rgb, Rgb) = ((180, 180, 180), (220, 220, 220));

/// Gradient endpoints for a temperature; gray when there is none.
pub(crate) fn temperature_palette(celsius: Option<i32>) -> (ArtColor, ArtColor) {
    let (from, to) = match celsius {
        None => NO_DATA_BAND,
        Some(t) => TEMPERATURE_BANDS
            .iter()
            .find(|(limit, _, _)| t < *limit)
            .map(|&(_, from, to)| (from, to))
            .unwrap_or(HOT_BAND),
    };
    (
        ArtColor::rgb(from.0, from.1, from.2),
        ArtColor::rgb(to.0, to.1, to.2),
    )
}

/// Static gradient, or a bright band sweeping left to right while loading.
fn title_fill(palette: (ArtColor, ArtColor), sweep: Option<f32>) -> Fill {
    let (from, to) = palette;
    let stops = match sweep {
        None => vec![ColorStop::new(0.0, from), ColorStop::new(1.0, to)],
        Some(position) => vec![
            ColorStop::new(0.0, from),
            ColorStop::new(position.clamp(0.05, 0.95), to),
            ColorStop::new(1.0, from),
        ],
    };
    Fill::Linear(LinearGradient::new(5.0, stops))
}

fn sweep_position(tick_count: u32) -> f32 {
    let cycle = LOADING_ANIM_CYCLE_TICKS.max(1);
    (tick_count % cycle) as f32 / cycle as f32
}

/// `Latitude 13.08   Longitude 80.27`
pub fn format_coords(lat: f64, lon: f64) -> String {
    format!("Latitude {lat}   Longitude {lon}")
}

impl Component<Action> for LocationHeader {
    type Props<'a> = LocationHeaderProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let [title_area, _, coords_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let sweep = props
            .is_animating
            .then(|| sweep_position(props.tick_count));
        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(title_fill(temperature_palette(props.temperature), sweep));
        frame.render_widget(ArtBox::new(&renderer, props.title), title_area);

        if let Some((lat, lon)) = props.coords {
            let line = Line::styled(format_coords(lat, lon), Style::default().fg(Color::DarkGray))
                .centered();
            frame.render_widget(Paragraph::new(line), coords_area);
        }
    }
}
