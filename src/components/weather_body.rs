use artbox::{
    Alignment as ArtAlignment, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::location_header::{HEADER_OVERHEAD, temperature_palette};
use super::{Component, ERROR_ICON, LocationHeader, LocationHeaderProps};
use crate::action::Action;
use crate::icons::{self, SPRITE_HEIGHT};
use crate::state::{AppState, SearchStatus, WeatherResult};

pub struct WeatherBody;

pub struct WeatherBodyProps<'a> {
    pub state: &'a AppState,
}

/// Fixed rows: blank + blank + description + details + status.
const LAYOUT_FIXED: u16 = 5;

/// Text cap tiers: (header_cap, temp_cap).
/// terminus(6), miniwi(4), plain(1); the header tier adds HEADER_OVERHEAD.
const TEXT_TIERS: [(u16, u16); 3] = [
    (6 + HEADER_OVERHEAD, 6),
    (4 + HEADER_OVERHEAD, 4),
    (1 + HEADER_OVERHEAD, 1),
];

struct LayoutSizing {
    show_sprite: bool,
    sprite_h: u16,
    header_cap: u16,
    temp_cap: u16,
}

/// Shrink the text tiers until the sprite fits; fall back to an emoji.
fn compute_layout(area_height: u16) -> LayoutSizing {
    for &(hcap, tcap) in &TEXT_TIERS {
        let budget = area_height.saturating_sub(hcap + tcap + LAYOUT_FIXED);
        if budget >= SPRITE_HEIGHT {
            return LayoutSizing {
                show_sprite: true,
                sprite_h: SPRITE_HEIGHT,
                header_cap: hcap,
                temp_cap: tcap,
            };
        }
    }
    let (hcap, tcap) = TEXT_TIERS[TEXT_TIERS.len() - 1];
    LayoutSizing {
        show_sprite: false,
        sprite_h: 1,
        header_cap: hcap,
        temp_cap: tcap,
    }
}

/// `31°C`
pub fn format_temperature(celsius: i32) -> String {
    format!("{celsius}°C")
}

/// `Humidity 80%   Wind Speed 3.1 km/h`
pub fn format_details(weather: &WeatherResult) -> String {
    format!(
        "Humidity {}%   Wind Speed {} km/h",
        weather.humidity, weather.wind_speed
    )
}

// ============================================================================
// Component
// ============================================================================

impl Component<Action> for WeatherBody {
    type Props<'a> = WeatherBodyProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let sizing = compute_layout(area.height);
        let state = props.state;

        match WeatherView::from_state(state) {
            WeatherView::Ready { weather, error } => {
                render_ready(frame, area, state, weather, error, &sizing);
            }
            WeatherView::Loading => {
                render_placeholder(
                    frame,
                    area,
                    state,
                    &sizing,
                    Line::styled("Loading...", Style::default().fg(Color::DarkGray)),
                );
            }
            WeatherView::NotFound => {
                render_placeholder(
                    frame,
                    area,
                    state,
                    &sizing,
                    Line::styled("City not found", Style::default().fg(Color::Red).bold()),
                );
            }
            WeatherView::Error(error) => render_error(frame, area, error),
            WeatherView::Empty => {
                render_placeholder(frame, area, state, &sizing, key_hint("Enter", " to search"));
            }
        }
    }
}

/// Header for a pending or unmatched query: the query text, no coordinates
fn render_query_header(frame: &mut Frame, area: Rect, state: &AppState) {
    LocationHeader.render(
        frame,
        area,
        LocationHeaderProps {
            title: &state.query,
            coords: None,
            temperature: None,
            is_animating: state.loading_anim_active(),
            tick_count: state.tick_count,
        },
    );
}

fn make_layout(area: Rect, sizing: &LayoutSizing) -> std::rc::Rc<[Rect]> {
    Layout::vertical([
        Constraint::Max(sizing.header_cap),
        Constraint::Length(1),
        Constraint::Length(sizing.sprite_h),
        Constraint::Length(1),
        Constraint::Max(sizing.temp_cap),
        Constraint::Length(1), // description
        Constraint::Length(1), // humidity + wind
        Constraint::Length(1), // status
    ])
    .flex(Flex::Center)
    .split(area)
}

fn render_ready(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    weather: &WeatherResult,
    error: Option<&str>,
    sizing: &LayoutSizing,
) {
    let chunks = make_layout(area, sizing);

    let title = if weather.country.is_empty() {
        weather.city.clone()
    } else {
        format!("{}, {}", weather.city, weather.country)
    };
    LocationHeader.render(
        frame,
        chunks[0],
        LocationHeaderProps {
            title: &title,
            coords: Some((weather.lat, weather.lon)),
            temperature: Some(weather.temperature),
            is_animating: state.loading_anim_active(),
            tick_count: state.tick_count,
        },
    );

    let sprite = if sizing.show_sprite {
        icons::condition_sprite(&weather.icon_code, sizing.sprite_h)
    } else {
        None
    };
    match sprite {
        Some(art) => {
            frame.render_widget(Paragraph::new(art).alignment(Alignment::Center), chunks[2]);
        }
        None => {
            let emoji = Line::from(icons::condition_emoji(&weather.icon_code)).centered();
            frame.render_widget(Paragraph::new(emoji), chunks[2]);
        }
    }

    let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
        .with_plain_fallback()
        .with_alignment(ArtAlignment::Center)
        .with_fill(temperature_gradient(weather.temperature));
    frame.render_widget(
        ArtBox::new(&renderer, &format_temperature(weather.temperature)),
        chunks[4],
    );

    let rows = [
        (weather.description.clone(), Color::Gray),
        (format_details(weather), Color::Cyan),
    ];
    for ((text, color), row) in rows.into_iter().zip([chunks[5], chunks[6]]) {
        let line = Line::styled(text, Style::default().fg(color)).centered();
        frame.render_widget(Paragraph::new(line), row);
    }

    if let Some(error) = error {
        let line = Line::styled(error.to_string(), Style::default().fg(Color::Rgb(200, 100, 100)));
        frame.render_widget(Paragraph::new(line.centered()), chunks[7]);
    }
}

/// Query header on top, a single status row at the bottom
fn render_placeholder(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    sizing: &LayoutSizing,
    status: Line<'static>,
) {
    let chunks = make_layout(area, sizing);
    render_query_header(frame, chunks[0], state);
    frame.render_widget(Paragraph::new(status.centered()), chunks[7]);
}

/// `Press <key> <action>` with the key highlighted
fn key_hint(key: &'static str, action: &'static str) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    Line::from(vec![
        Span::styled("Press ", dim),
        Span::styled(key, Style::default().fg(Color::Cyan).bold()),
        Span::styled(action, dim),
    ])
}

fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let lines = vec![
        Line::from(ERROR_ICON),
        Line::styled("Error", Style::default().fg(Color::Red).bold()),
        Line::styled(error.to_string(), Style::default().fg(Color::Rgb(200, 100, 100))),
        Line::default(),
        key_hint("Enter", " to retry"),
    ];
    let height = lines.len() as u16;
    let [panel] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), panel);
}

// ============================================================================
// Helpers
// ============================================================================

enum WeatherView<'a> {
    Ready {
        weather: &'a WeatherResult,
        error: Option<&'a str>,
    },
    Loading,
    NotFound,
    Error(&'a str),
    Empty,
}

impl<'a> WeatherView<'a> {
    /// Details stay visible after a failed search if an earlier one succeeded;
    /// loading and not-found hide them.
    fn from_state(state: &'a AppState) -> Self {
        match (&state.status, &state.weather) {
            (SearchStatus::Loading, _) => WeatherView::Loading,
            (SearchStatus::NotFound, _) => WeatherView::NotFound,
            (SearchStatus::Failed(error), Some(weather)) => WeatherView::Ready {
                weather,
                error: Some(error),
            },
            (SearchStatus::Failed(error), None) => WeatherView::Error(error),
            (SearchStatus::Idle, Some(weather)) => WeatherView::Ready {
                weather,
                error: None,
            },
            (SearchStatus::Idle, None) => WeatherView::Empty,
        }
    }
}

fn temperature_gradient(celsius: i32) -> Fill {
    let (start, end) = temperature_palette(Some(celsius));
    Fill::Linear(LinearGradient::horizontal(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_details() {
        let weather = WeatherResult {
            humidity: 80,
            wind_speed: 3.1,
            ..Default::default()
        };
        assert_eq!(format_details(&weather), "Humidity 80%   Wind Speed 3.1 km/h");
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(31), "31°C");
        assert_eq!(format_temperature(-3), "-3°C");
    }

    #[test]
    fn test_compute_layout_shrinks_text_before_dropping_sprite() {
        let roomy = compute_layout(40);
        assert!(roomy.show_sprite);
        assert_eq!(roomy.header_cap, 6 + HEADER_OVERHEAD);

        let tight = compute_layout(3 + 1 + LAYOUT_FIXED + SPRITE_HEIGHT);
        assert!(tight.show_sprite);
        assert_eq!(tight.temp_cap, 1);

        let tiny = compute_layout(4);
        assert!(!tiny.show_sprite);
        assert_eq!(tiny.sprite_h, 1);
    }
}
